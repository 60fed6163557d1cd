//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/` 和库模块 `batch/`, `io/`, `plot/`
//! - 子模块: pairs, show

pub mod pairs;
pub mod show;

use crate::cli::Commands;
use openpiv_tools::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Pairs(args) => pairs::list(args),
        Commands::Negative(args) => pairs::negative(args),
        Commands::ShowField(args) => show::show_field(args),
        Commands::ShowWindows(args) => show::show_windows(args),
    }
}

/// 将单字符分隔符转换为字节
pub(crate) fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(openpiv_tools::PivError::InvalidArgument(format!(
            "delimiter must be an ASCII character, got '{}'",
            delimiter
        )))
    }
}
