//! # show-field / show-windows 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/show.rs`

use clap::Args;
use std::path::PathBuf;

/// show-field 子命令参数
#[derive(Args, Debug)]
pub struct ShowFieldArgs {
    /// Flow field text file (x, y, u, v, mask columns)
    pub field: PathBuf,

    /// Output image (.png or .svg)
    #[arg(short, long, default_value = "vector_field.png")]
    pub output: PathBuf,

    /// Draw the vector field on top of this image
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Interrogation window size used to fit the background image
    #[arg(long, default_value_t = 32.0)]
    pub window_size: f64,

    /// Scaling factor between image pixels and field coordinates
    #[arg(long, default_value_t = 1.0)]
    pub scaling_factor: f64,

    /// Arrow length multiplier
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Column delimiter of the field file
    #[arg(long, default_value_t = '\t')]
    pub delimiter: char,

    /// Image width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

/// show-windows 子命令参数
#[derive(Args, Debug)]
pub struct ShowWindowsArgs {
    /// Flow field text file providing the interrogation points
    pub field: PathBuf,

    /// Output image (.png or .svg)
    #[arg(short, long, default_value = "windows.png")]
    pub output: PathBuf,

    /// Interrogation window size in pixels
    #[arg(long, default_value_t = 32.0)]
    pub window_size: f64,

    /// Windows to skip on a row (-1 shows points only)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub skip: i64,

    /// Sampling method: standard or random
    #[arg(long, default_value = "standard")]
    pub method: String,

    /// Seed for the random sampling method
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Column delimiter of the field file
    #[arg(long, default_value_t = '\t')]
    pub delimiter: char,
}
