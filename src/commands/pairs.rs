//! # pairs / negative 命令实现
//!
//! ## 功能
//! - `pairs`: 以表格列出配对结果，用于检查模式是否正确
//! - `negative`: 对每个图像对生成负片，可并行
//!
//! ## 依赖关系
//! - 使用 `cli/pairs.rs` 定义的参数
//! - 使用 `batch/` 模块配对与分发
//! - 使用 `io/image.rs` 读写图像

use crate::cli::pairs::{NegativeArgs, PairsArgs};
use openpiv_tools::batch::{Multiprocessor, WorkItem};
use openpiv_tools::error::{PivError, Result};
use openpiv_tools::io::image as piv_image;
use openpiv_tools::utils::output;

use anyhow::Context;
use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

/// 表格中的一行
#[derive(Tabled)]
struct PairRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Frame A")]
    file_a: String,
    #[tabled(rename = "Frame B")]
    file_b: String,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// 执行 pairs 命令
pub fn list(args: PairsArgs) -> Result<()> {
    output::print_header("Frame Pairs");

    let multi = Multiprocessor::new(
        &args.frames.data_dir,
        &args.frames.pattern_a,
        &args.frames.pattern_b,
    )?;

    output::print_info(&format!("Directory: {}", multi.base_dir().display()));

    let rows: Vec<PairRow> = multi
        .work_items()
        .iter()
        .map(|item| PairRow {
            index: item.index(),
            file_a: file_name(item.file_a()),
            file_b: file_name(item.file_b()),
        })
        .collect();

    println!("{}", Table::new(rows));
    output::print_success(&format!("{} pairs found", multi.len()));
    Ok(())
}

/// 执行 negative 命令
pub fn negative(args: NegativeArgs) -> Result<()> {
    output::print_header("Negative Images");

    let mut multi = Multiprocessor::new(
        &args.frames.data_dir,
        &args.frames.pattern_a,
        &args.frames.pattern_b,
    )?
    .with_progress(true);

    output::print_info(&format!("Found {} frame pairs", multi.len()));

    fs::create_dir_all(&args.output).map_err(|e| PivError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let jobs = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    output::print_info(&format!("Using {} worker(s)", jobs));

    let out_dir = args.output.as_path();
    let overwrite = args.overwrite;
    let process = |item: &WorkItem| -> anyhow::Result<()> {
        for frame in [item.file_a(), item.file_b()] {
            write_negative(frame, out_dir, overwrite)?;
        }
        Ok(())
    };

    match multi.run(&process, jobs) {
        Ok(report) => {
            output::print_separator();
            output::print_success(&format!(
                "Batch complete: {} of {} pairs processed",
                report.succeeded, report.total
            ));
            Ok(())
        }
        Err(PivError::BatchFailed { total, failures }) => {
            output::print_separator();
            output::print_failures(&failures, 10);
            Err(PivError::BatchFailed { total, failures })
        }
        Err(e) => Err(e),
    }
}

/// 负片文件名：`<stem>_<ext>_neg.png`，保留扩展名以区分同名不同格式的帧
fn negative_name(frame_path: &Path) -> String {
    let stem = frame_path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "frame".into());
    match frame_path.extension() {
        Some(ext) => format!("{}_{}_neg.png", stem, ext.to_string_lossy()),
        None => format!("{}_neg.png", stem),
    }
}

/// 写出单帧负片
fn write_negative(frame_path: &Path, out_dir: &Path, overwrite: bool) -> anyhow::Result<()> {
    let target = out_dir.join(negative_name(frame_path));

    if target.exists() && !overwrite {
        log::info!("Output exists, skipping: {}", target.display());
        return Ok(());
    }

    let frame = piv_image::imread(frame_path)
        .with_context(|| format!("reading {}", frame_path.display()))?;
    piv_image::imsave(&target, &piv_image::negative(&frame))
        .with_context(|| format!("writing {}", target.display()))?;

    log::debug!("{} -> {}", frame_path.display(), target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_name_keeps_extension() {
        let png = negative_name(Path::new("/data/exp1_001_a.png"));
        let tif = negative_name(Path::new("/data/exp1_001_a.tif"));
        assert_eq!(png, "exp1_001_a_png_neg.png");
        assert_eq!(tif, "exp1_001_a_tif_neg.png");
        assert_ne!(png, tif);
    }

    #[test]
    fn test_negative_name_without_extension() {
        assert_eq!(negative_name(Path::new("frames/raw_0007")), "raw_0007_neg.png");
    }
}
