//! # pairs / negative 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/pairs.rs`

use clap::Args;
use std::path::PathBuf;

/// 图像对选择参数
#[derive(Args, Debug)]
pub struct FrameArgs {
    /// Directory containing the image files
    pub data_dir: PathBuf,

    /// Glob pattern matching the first frames
    #[arg(short = 'a', long, default_value = "*_a.*")]
    pub pattern_a: String,

    /// Glob pattern matching the second frames
    #[arg(short = 'b', long, default_value = "*_b.*")]
    pub pattern_b: String,
}

/// pairs 子命令参数
#[derive(Args, Debug)]
pub struct PairsArgs {
    #[command(flatten)]
    pub frames: FrameArgs,
}

/// negative 子命令参数
#[derive(Args, Debug)]
pub struct NegativeArgs {
    #[command(flatten)]
    pub frames: FrameArgs,

    /// Output directory for the negative images
    #[arg(short, long, default_value = "negatives")]
    pub output: PathBuf,

    /// Number of parallel workers (1 = sequential, 0 = one per CPU)
    #[arg(short, long, default_value_t = 1, env = "PIV_JOBS")]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
