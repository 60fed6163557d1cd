//! # 查询窗口分布图
//!
//! 显示查询点（绿色）及被选中的查询窗口（半透明红色方块）。
//!
//! ## 采样方式
//! - `standard`: 均匀选取，偶数行取 `i % (skip+1) == 0` 的列，
//!   奇数行取 `i % (skip+1) == 1` 的列（`skip == 0` 时全选）
//! - `random`: 由给定种子随机选取 `nx*ny/(skip+1)` 个窗口
//!
//! `skip < 0` 或 `skip + 1` 超过窗口总数时只绘制查询点。
//!
//! ## 依赖关系
//! - 被 `commands/show.rs` 调用
//! - 使用 `plotters` 渲染，`rand` 生成可复现的随机采样

use super::{is_svg, plot_err};
use crate::error::{PivError, Result};

use plotters::coord::Shift;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 窗口采样方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMethod {
    Standard,
    Random,
}

impl FromStr for SamplingMethod {
    type Err = PivError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(SamplingMethod::Standard),
            "random" => Ok(SamplingMethod::Random),
            other => Err(PivError::InvalidArgument(format!(
                "method not valid: '{}', choose between standard and random",
                other
            ))),
        }
    }
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingMethod::Standard => write!(f, "standard"),
            SamplingMethod::Random => write!(f, "random"),
        }
    }
}

/// 窗口分布图选项
#[derive(Debug, Clone)]
pub struct WindowsOptions {
    /// 查询窗口大小（像素）
    pub window_size: f64,
    /// 每行跳过的窗口数，负数表示不显示窗口
    pub skip: i64,
    /// 采样方式
    pub method: SamplingMethod,
    /// 随机采样种子
    pub seed: u64,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowsOptions {
    fn default() -> Self {
        Self {
            window_size: 32.0,
            skip: 0,
            method: SamplingMethod::Standard,
            seed: 0,
            width: 1000,
            height: 800,
        }
    }
}

/// 选取要绘制的窗口，返回 `(列, 行)` 索引
///
/// 返回 `None` 表示只绘制查询点。
pub fn sample_windows(
    nx: usize,
    ny: usize,
    options: &WindowsOptions,
) -> Option<Vec<(usize, usize)>> {
    let total = nx.saturating_mul(ny);
    // 负数或溢出的 skip 同样只画点
    let step = usize::try_from(options.skip)
        .ok()
        .and_then(|skip| skip.checked_add(1))?;
    if step > total {
        return None;
    }

    let picked = match options.method {
        SamplingMethod::Standard => {
            let mut picked = Vec::new();
            for i in 0..nx {
                for j in 0..ny {
                    let selected = if j % 2 == 0 {
                        i % step == 0
                    } else {
                        i % step == 1 || options.skip == 0
                    };
                    if selected {
                        picked.push((i, j));
                    }
                }
            }
            picked
        }
        SamplingMethod::Random => {
            let mut rng = StdRng::seed_from_u64(options.seed);
            (0..total / step)
                .map(|_| (rng.gen_range(0..nx), rng.gen_range(0..ny)))
                .collect()
        }
    };

    Some(picked)
}

/// 绘制查询窗口分布图
///
/// `columns` 为各列的 x 坐标，`rows` 为各行的 y 坐标。
pub fn render_windows_sampling(
    columns: &[f64],
    rows: &[f64],
    output_path: &Path,
    options: &WindowsOptions,
) -> Result<()> {
    if columns.is_empty() || rows.is_empty() {
        return Err(PivError::InvalidArgument(
            "no interrogation points to display".to_string(),
        ));
    }

    let picked = sample_windows(columns.len(), rows.len(), options);
    let title = window_map_title(picked.as_deref(), options.method);

    let size = (options.width, options.height);
    if is_svg(output_path) {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_windows(&root, columns, rows, picked.as_deref(), &title, options)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_windows(&root, columns, rows, picked.as_deref(), &title, options)?;
        root.present().map_err(plot_err)?;
    }

    Ok(())
}

fn window_map_title(picked: Option<&[(usize, usize)]>, method: SamplingMethod) -> String {
    match (picked, method) {
        (None, _) => "interrogation points map".to_string(),
        (Some(_), SamplingMethod::Standard) => "interrogation window map".to_string(),
        (Some(windows), SamplingMethod::Random) => format!(
            "interrogation window map, showing randomly {} windows",
            windows.len()
        ),
    }
}

fn draw_windows<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    columns: &[f64],
    rows: &[f64],
    picked: Option<&[(usize, usize)]>,
    title: &str,
    options: &WindowsOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let half = options.window_size / 2.0;
    let min_of = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);
    let max_of = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            (min_of(columns) - half)..(max_of(columns) + half),
            (min_of(rows) - half)..(max_of(rows) + half),
        )
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("x (px)")
        .y_desc("y (px)")
        .draw()
        .map_err(plot_err)?;

    if let Some(windows) = picked {
        let fill = RED.mix(0.5).filled();
        chart
            .draw_series(windows.iter().map(|&(i, j)| {
                let x1 = columns[i] - half;
                let y1 = rows[j] - half;
                Rectangle::new(
                    [(x1, y1), (x1 + options.window_size, y1 + options.window_size)],
                    fill,
                )
            }))
            .map_err(plot_err)?;
    }

    let green = RGBColor(0, 160, 0).filled();
    chart
        .draw_series(
            rows.iter()
                .flat_map(|&y| columns.iter().map(move |&x| Circle::new((x, y), 3, green))),
        )
        .map_err(plot_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(skip: i64, method: SamplingMethod) -> WindowsOptions {
        WindowsOptions {
            skip,
            method,
            seed: 42,
            ..Default::default()
        }
    }

    #[test]
    fn test_standard_skip_zero_selects_all() {
        let picked = sample_windows(4, 3, &options(0, SamplingMethod::Standard)).unwrap();
        assert_eq!(picked.len(), 12);
    }

    #[test]
    fn test_standard_staggered_rows() {
        let picked = sample_windows(4, 2, &options(1, SamplingMethod::Standard)).unwrap();
        // 偶数行取 0、2 列，奇数行取 1、3 列
        assert_eq!(picked, vec![(0, 0), (1, 1), (2, 0), (3, 1)]);
    }

    #[test]
    fn test_points_only() {
        assert!(sample_windows(3, 3, &options(-1, SamplingMethod::Standard)).is_none());
        assert!(sample_windows(3, 3, &options(9, SamplingMethod::Random)).is_none());
        assert!(sample_windows(3, 3, &options(8, SamplingMethod::Standard)).is_some());
        assert!(sample_windows(3, 3, &options(i64::MAX, SamplingMethod::Standard)).is_none());
    }

    #[test]
    fn test_random_is_seeded() {
        let first = sample_windows(10, 8, &options(3, SamplingMethod::Random)).unwrap();
        let second = sample_windows(10, 8, &options(3, SamplingMethod::Random)).unwrap();
        assert_eq!(first.len(), 20);
        assert_eq!(first, second);
        assert!(first.iter().all(|&(i, j)| i < 10 && j < 8));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("Random".parse::<SamplingMethod>().unwrap(), SamplingMethod::Random);
        assert!(matches!(
            "gaussian".parse::<SamplingMethod>(),
            Err(PivError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_titles() {
        assert_eq!(
            window_map_title(None, SamplingMethod::Random),
            "interrogation points map"
        );
        assert_eq!(
            window_map_title(Some(&[(0, 0), (1, 1)][..]), SamplingMethod::Random),
            "interrogation window map, showing randomly 2 windows"
        );
    }
}
