//! # 流场可视化模块
//!
//! 使用 `plotters` 生成矢量场图和查询窗口分布图。
//!
//! ## 子模块
//! - `vector_field`: 矢量场（quiver）图，可叠加背景图像
//! - `windows`: 查询点与查询窗口分布图
//!
//! ## 依赖关系
//! - 被 `commands/show.rs` 调用
//! - 使用 `io/` 模块读取流场与图像

pub mod vector_field;
pub mod windows;

pub use vector_field::{render_vector_field, VectorFieldOptions};
pub use windows::{render_windows_sampling, sample_windows, SamplingMethod, WindowsOptions};

use crate::error::PivError;
use std::path::Path;

/// 输出路径扩展名为 `.svg` 时使用 SVG 后端，否则输出位图
pub(crate) fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

pub(crate) fn plot_err<E: std::fmt::Debug>(e: E) -> PivError {
    PivError::PlotError(format!("{:?}", e))
}
