//! # 文件收集器
//!
//! 根据数据目录和 glob 模式收集一组帧文件（FileSet）。
//!
//! ## 功能
//! - 将数据目录解析为绝对路径
//! - glob 模式匹配（`*`, `?`, `[...]`）
//! - 按完整路径字典序排序
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `glob` 展开模式

use crate::error::{PivError, Result};

use std::path::{Component, Path, PathBuf};

/// 文件收集器
pub struct FileCollector {
    /// 数据目录（绝对路径）
    base_dir: PathBuf,
}

impl FileCollector {
    /// 创建新的文件收集器，相对路径基于当前工作目录解析
    pub fn new(base_dir: &Path) -> Result<Self> {
        let absolute = std::path::absolute(base_dir).map_err(|e| PivError::FileReadError {
            path: base_dir.display().to_string(),
            source: e,
        })?;
        Ok(Self {
            base_dir: normalize(&absolute),
        })
    }

    /// 数据目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 收集所有匹配的文件，按路径字典序排序
    pub fn collect(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        // 目录名中的通配符按字面匹配
        let escaped = glob::Pattern::escape(&self.base_dir.to_string_lossy());
        let full_pattern = PathBuf::from(escaped).join(pattern);
        let full_pattern = full_pattern.to_string_lossy();

        // 与 shell 一致：`*` 和 `?` 不匹配隐藏文件的前导 `.`
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..Default::default()
        };
        let entries =
            glob::glob_with(&full_pattern, options).map_err(|e| PivError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();

        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        log::debug!(
            "Pattern '{}' matched {} files in {}",
            pattern,
            files.len(),
            self.base_dir.display()
        );

        Ok(files)
    }
}

/// 按字面消去 `.` 和 `..`，不访问文件系统
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn test_collect_sorted_absolute() {
        let tmp = TempDir::new().unwrap();
        touch(
            tmp.path(),
            &["img_002_a.png", "img_000_a.png", "img_001_a.png", "img_000_b.png"],
        );

        let collector = FileCollector::new(tmp.path()).unwrap();
        let files = collector.collect("img_*_a.png").unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["img_000_a.png", "img_001_a.png", "img_002_a.png"]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_collect_skips_directories() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), &["frame_a.bmp"]);
        fs::create_dir(tmp.path().join("sub_a.bmp")).unwrap();

        let collector = FileCollector::new(tmp.path()).unwrap();
        let files = collector.collect("*_a.bmp").unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_collect_question_mark() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), &["exp1_1.tif", "exp1_12.tif"]);

        let collector = FileCollector::new(tmp.path()).unwrap();
        assert_eq!(collector.collect("exp1_?.tif").unwrap().len(), 1);
        assert_eq!(collector.collect("*.tif").unwrap().len(), 2);
        assert!(collector.collect("*.png").unwrap().is_empty());
    }

    #[test]
    fn test_collect_skips_hidden_files() {
        let tmp = TempDir::new().unwrap();
        // macOS 资源分叉文件
        touch(tmp.path(), &["img_000_a.png", "._img_000_a.png", ".img_001_a.png"]);

        let collector = FileCollector::new(tmp.path()).unwrap();
        let files = collector.collect("*_a.png").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("img_000_a.png"));

        // 显式写出前导点时仍可匹配
        assert_eq!(collector.collect(".*_a.png").unwrap().len(), 2);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/data/run1/../run2/./frames")),
            PathBuf::from("/data/run2/frames")
        );
        assert_eq!(normalize(Path::new("/../data")), PathBuf::from("/data"));
    }

    #[test]
    fn test_invalid_pattern() {
        let tmp = TempDir::new().unwrap();
        let collector = FileCollector::new(tmp.path()).unwrap();
        let err = collector.collect("img_[*.png").unwrap_err();
        assert!(matches!(err, PivError::InvalidPattern { .. }));
    }
}
