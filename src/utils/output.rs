//! # 终端输出
//!
//! 命令行各子命令共用的带标记输出，以及批处理失败清单。
//!
//! ## 依赖关系
//! - 被 `main.rs` 和 `commands/` 模块使用
//! - 使用 `colored` crate

use crate::error::PairFailure;

use colored::{ColoredString, Colorize};

/// 分隔线宽度
const RULE_WIDTH: usize = 60;

/// 消息级别，决定行首标记及输出流
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Err,
    Warn,
    Info,
}

impl Status {
    fn tag(self) -> ColoredString {
        match self {
            Status::Ok => "[OK]".green().bold(),
            Status::Err => "[ERR]".red().bold(),
            Status::Warn => "[WARN]".yellow().bold(),
            Status::Info => "[*]".blue().bold(),
        }
    }
}

/// 带标记的一行；错误写到 stderr
pub fn print_status(status: Status, msg: &str) {
    let line = format!("{} {}", status.tag(), msg);
    match status {
        Status::Err => eprintln!("{}", line),
        _ => println!("{}", line),
    }
}

pub fn print_success(msg: &str) {
    print_status(Status::Ok, msg);
}

pub fn print_error(msg: &str) {
    print_status(Status::Err, msg);
}

pub fn print_warning(msg: &str) {
    print_status(Status::Warn, msg);
}

pub fn print_info(msg: &str) {
    print_status(Status::Info, msg);
}

/// 输入帧与其输出文件
pub fn print_written(input: &str, output: &str) {
    println!("{} {} => {}", Status::Ok.tag(), input.dimmed(), output.cyan());
}

pub fn print_header(title: &str) {
    println!();
    print_separator();
    println!("  {}", title.bold());
    print_separator();
}

pub fn print_separator() {
    println!("{}", rule().dimmed());
}

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

/// 列出失败的图像对，最多 `limit` 条，其余只给出数量
pub fn print_failures(failures: &[PairFailure], limit: usize) {
    print_warning(&format!("{} pair(s) failed:", failures.len()));
    for failure in failures.iter().take(limit) {
        print_error(&format!("  {}", failure));
    }
    if let Some(hidden) = hidden_count(failures.len(), limit) {
        print_warning(&format!("  ... {} more not shown", hidden));
    }
}

/// 超出显示上限的条数
fn hidden_count(total: usize, limit: usize) -> Option<usize> {
    total.checked_sub(limit).filter(|&n| n > 0)
}
