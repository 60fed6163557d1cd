//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `pairs`: 列出配对的图像文件
//! - `negative`: 批量生成图像对的负片
//! - `show-field`: 绘制流场矢量图
//! - `show-windows`: 绘制查询窗口分布图
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: pairs, show

pub mod pairs;
pub mod show;

use clap::{ArgAction, Parser, Subcommand};

/// openpiv-tools - PIV 图像对批处理与流场可视化工具
#[derive(Parser)]
#[command(name = "openpiv-tools")]
#[command(version)]
#[command(about = "Batch image-pair processing and flow-field plotting for PIV", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// List the matched frame pairs without processing them
    Pairs(pairs::PairsArgs),

    /// Write the negative of every frame pair
    Negative(pairs::NegativeArgs),

    /// Plot a saved flow field as a quiver plot
    ShowField(show::ShowFieldArgs),

    /// Plot the interrogation points and windows of a saved flow field
    ShowWindows(show::ShowWindowsArgs),
}
