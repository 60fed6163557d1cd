//! # 矢量场图
//!
//! 绘制保存的流场文件：有效矢量为蓝色，无效矢量为红色。
//!
//! ## 功能
//! - 箭头长度按 `scale` 缩放
//! - 可选背景图像（取反后显示），范围按窗口大小与缩放系数对齐流场
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 使用 `io/field.rs` 的 FlowField
//! - 使用 `io/image.rs` 读取背景
//! - 使用 `plotters` 渲染图表

use super::{is_svg, plot_err};
use crate::error::{PivError, Result};
use crate::io::field::FlowField;
use crate::io::image::{self as piv_image, Frame};

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// 背景图像最多绘制的格子数（每个方向）
const MAX_BACKGROUND_CELLS: usize = 256;

/// 矢量场图选项
#[derive(Debug, Clone)]
pub struct VectorFieldOptions {
    /// 背景图像路径
    pub background: Option<PathBuf>,
    /// 查询窗口大小（像素）
    pub window_size: f64,
    /// 图像到流场坐标的缩放系数
    pub scaling_factor: f64,
    /// 箭头长度缩放
    pub scale: f64,
    /// 图像宽度
    pub width: u32,
    /// 图像高度
    pub height: u32,
}

impl Default for VectorFieldOptions {
    fn default() -> Self {
        Self {
            background: None,
            window_size: 32.0,
            scaling_factor: 1.0,
            scale: 1.0,
            width: 1000,
            height: 800,
        }
    }
}

/// 绘制矢量场图
pub fn render_vector_field(
    field: &FlowField,
    output_path: &Path,
    options: &VectorFieldOptions,
) -> Result<()> {
    if field.is_empty() {
        return Err(PivError::InvalidArgument(
            "flow field contains no vectors".to_string(),
        ));
    }
    if options.scaling_factor <= 0.0 {
        return Err(PivError::InvalidArgument(format!(
            "scaling factor must be positive, got {}",
            options.scaling_factor
        )));
    }

    let background = match &options.background {
        Some(path) => Some(piv_image::negative(&piv_image::imread(path)?)),
        None => None,
    };

    let size = (options.width, options.height);
    if is_svg(output_path) {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_vector_field(&root, field, background.as_ref(), options)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_vector_field(&root, field, background.as_ref(), options)?;
        root.present().map_err(plot_err)?;
    }

    log::info!(
        "Rendered {} vectors to {}",
        field.len(),
        output_path.display()
    );
    Ok(())
}

/// 坐标范围 `(x_min, x_max, y_min, y_max)`
fn plot_bounds(
    field: &FlowField,
    options: &VectorFieldOptions,
    with_background: bool,
) -> (f64, f64, f64, f64) {
    let max_of = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_of = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);

    if with_background {
        let pad = options.window_size / (2.0 * options.scaling_factor);
        return (0.0, max_of(field.x()) + pad, 0.0, max_of(field.y()) + pad);
    }

    let reach = field
        .vectors()
        .map(|(_, _, u, v, _)| u.hypot(v) * options.scale)
        .fold(0.0, f64::max);
    let pad = reach.max(1.0);

    (
        min_of(field.x()) - pad,
        max_of(field.x()) + pad,
        min_of(field.y()) - pad,
        max_of(field.y()) + pad,
    )
}

/// 箭头线段：主干与两条箭头边
pub(crate) fn arrow_segments(x: f64, y: f64, dx: f64, dy: f64) -> [[(f64, f64); 2]; 3] {
    let tip = (x + dx, y + dy);
    let length = dx.hypot(dy);
    let head = 0.3 * length;
    let angle = dy.atan2(dx);
    let spread = std::f64::consts::FRAC_PI_6;

    let left = (
        tip.0 - head * (angle - spread).cos(),
        tip.1 - head * (angle - spread).sin(),
    );
    let right = (
        tip.0 - head * (angle + spread).cos(),
        tip.1 - head * (angle + spread).sin(),
    );

    [[(x, y), tip], [tip, left], [tip, right]]
}

fn draw_vector_field<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    field: &FlowField,
    background: Option<&Frame>,
    options: &VectorFieldOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let (x_min, x_max, y_min, y_max) = plot_bounds(field, options, background.is_some());
    let title = format!("Vector field, {} wrong vectors", field.invalid_count());

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("x (px)")
        .y_desc("y (px)")
        .draw()
        .map_err(plot_err)?;

    if let Some(frame) = background {
        draw_background(&mut chart, frame, x_max, y_max)?;
    }

    // 先画无效矢量，再画有效矢量
    for (invalid, color) in [(true, RED), (false, BLUE)] {
        let segments: Vec<[(f64, f64); 2]> = field
            .vectors()
            .filter(|&(.., m)| m == invalid)
            .flat_map(|(x, y, u, v, _)| arrow_segments(x, y, u * options.scale, v * options.scale))
            .collect();

        chart
            .draw_series(
                segments
                    .into_iter()
                    .map(|seg| PathElement::new(seg.to_vec(), color.stroke_width(1))),
            )
            .map_err(plot_err)?;
    }

    Ok(())
}

/// 以灰度格子绘制背景，图像第 0 行位于底部
fn draw_background<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    frame: &Frame,
    x_max: f64,
    y_max: f64,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (w, h) = (frame.width(), frame.height());
    if w == 0 || h == 0 {
        return Ok(());
    }

    let cols = w.min(MAX_BACKGROUND_CELLS);
    let rows = h.min(MAX_BACKGROUND_CELLS);
    let dx = x_max / cols as f64;
    let dy = y_max / rows as f64;

    let mut cells = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        let py = (r * h + h / (2 * rows)) / rows;
        for c in 0..cols {
            let px = (c * w + w / (2 * cols)) / cols;
            let grey = frame.get(px.min(w - 1), py.min(h - 1)).unwrap_or(0).clamp(0, 255) as u8;
            let x0 = c as f64 * dx;
            let y0 = r as f64 * dy;
            cells.push(Rectangle::new(
                [(x0, y0), (x0 + dx, y0 + dy)],
                RGBColor(grey, grey, grey).filled(),
            ));
        }
    }

    chart.draw_series(cells).map_err(plot_err)?;
    Ok(())
}
