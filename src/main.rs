//! # openpiv-tools 命令行入口
//!
//! ## 子命令
//! - `pairs`        - 列出图像对
//! - `negative`     - 批量生成负片
//! - `show-field`   - 绘制流场矢量图
//! - `show-windows` - 绘制查询窗口分布图
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   └── commands/   (命令执行逻辑)
//!         └── openpiv_tools (batch, io, plot, utils, error)
//! ```

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use log::LevelFilter;
use openpiv_tools::utils::output;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = commands::run(cli.command) {
        output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
