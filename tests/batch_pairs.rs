//! 图像对批处理端到端测试：真实 PNG 帧、按序号写出流场文件。

use openpiv_tools::batch::{Multiprocessor, WorkItem};
use openpiv_tools::io::{self, Frame, FlowField, SaveOptions};
use openpiv_tools::PivError;

use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_frames(dir: &Path, count: usize) {
    for i in 0..count {
        for (suffix, level) in [("a", 10 * i as i32), ("b", 10 * i as i32 + 5)] {
            let frame = Frame::new(4, 4, vec![level; 16]).unwrap();
            io::imsave(&dir.join(format!("exp1_{:03}_{}.png", i, suffix)), &frame).unwrap();
        }
    }
}

/// 用两帧平均灰度差构造一个单矢量"流场"
fn mean_shift(item: &WorkItem, out_dir: &Path) -> anyhow::Result<()> {
    let a = io::imread(item.file_a())?;
    let b = io::imread(item.file_b())?;
    let mean = |f: &Frame| f.data().iter().map(|&v| v as f64).sum::<f64>() / f.data().len() as f64;

    let field = FlowField::new(
        vec![item.index() as f64],
        vec![0.0],
        vec![mean(&b) - mean(&a)],
        vec![0.0],
        vec![false],
    )?;
    io::save(
        &field,
        &out_dir.join(item.output_name("result", "txt")),
        &SaveOptions::default(),
    )?;
    Ok(())
}

#[test]
fn sequential_and_parallel_write_same_results() {
    let _ = env_logger::builder().is_test(true).try_init();
    let data = TempDir::new().unwrap();
    write_frames(data.path(), 6);

    let mut multi = Multiprocessor::new(data.path(), "exp1_*_a.png", "exp1_*_b.png").unwrap();
    assert_eq!(multi.len(), 6);

    let seq_out = TempDir::new().unwrap();
    let par_out = TempDir::new().unwrap();

    let seq = multi
        .run(&|item: &WorkItem| mean_shift(item, seq_out.path()), 1)
        .unwrap();
    let par = multi
        .run(&|item: &WorkItem| mean_shift(item, par_out.path()), 3)
        .unwrap();
    assert_eq!(seq, par);
    assert!(par.is_complete());

    for i in 0..6 {
        let name = format!("result_{:04}.txt", i);
        let a = fs::read_to_string(seq_out.path().join(&name)).unwrap();
        let b = fs::read_to_string(par_out.path().join(&name)).unwrap();
        assert_eq!(a, b);

        let field = io::load(&seq_out.path().join(&name)).unwrap();
        assert_eq!(field.x(), &[i as f64]);
        assert_eq!(field.u(), &[5.0]);
    }
}

#[test]
fn unreadable_frame_is_reported_by_index() {
    let data = TempDir::new().unwrap();
    write_frames(data.path(), 5);
    // 第 1 对的第二帧不是有效图像
    fs::write(data.path().join("exp1_001_b.png"), b"not a png").unwrap();

    let out = TempDir::new().unwrap();
    let mut multi = Multiprocessor::new(data.path(), "exp1_*_a.png", "exp1_*_b.png").unwrap();
    let err = multi
        .run(&|item: &WorkItem| mean_shift(item, out.path()), 3)
        .unwrap_err();

    assert_eq!(err.failed_indices(), vec![1]);
    match err {
        PivError::BatchFailed { total, failures } => {
            assert_eq!(total, 5);
            assert!(failures[0].file_b.ends_with("exp1_001_b.png"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // 其余 4 对照常完成
    let written = fs::read_dir(out.path()).unwrap().count();
    assert_eq!(written, 4);
}

#[test]
fn relative_directory_yields_absolute_paths() {
    let data = TempDir::new().unwrap();
    write_frames(data.path(), 2);

    let cwd = std::env::current_dir().unwrap();
    let relative = relative_to(data.path(), &cwd);
    let multi = Multiprocessor::new(&relative, "exp1_*_a.png", "exp1_*_b.png").unwrap();

    assert_eq!(multi.base_dir(), data.path());
    assert!(multi.files_a().iter().all(|p| p.is_absolute()));
}

/// `target` 相对于 `base` 的路径（均为绝对路径）
fn relative_to(target: &Path, base: &Path) -> std::path::PathBuf {
    let target: Vec<_> = target.components().collect();
    let base: Vec<_> = base.components().collect();
    let common = target
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = std::path::PathBuf::new();
    for _ in common..base.len() {
        out.push("..");
    }
    for c in &target[common..] {
        out.push(c.as_os_str());
    }
    out
}
