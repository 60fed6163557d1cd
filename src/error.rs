//! # 统一错误处理模块
//!
//! 定义 openpiv-tools 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 单个图像对的处理失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFailure {
    /// 图像对序号
    pub index: usize,
    /// 第一帧路径
    pub file_a: PathBuf,
    /// 第二帧路径
    pub file_b: PathBuf,
    /// 失败原因
    pub reason: String,
}

impl fmt::Display for PairFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pair {} ({}, {}): {}",
            self.index,
            self.file_a.display(),
            self.file_b.display(),
            self.reason
        )
    }
}

/// openpiv-tools 统一错误类型
#[derive(Error, Debug)]
pub enum PivError {
    // ─────────────────────────────────────────────────────────────
    // 文件配对错误
    // ─────────────────────────────────────────────────────────────
    #[error(
        "There should be an equal number of \"a\" and \"b\" files: found {count_a} and {count_b}"
    )]
    MismatchedCount { count_a: usize, count_b: usize },

    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 批处理错误
    // ─────────────────────────────────────────────────────────────
    #[error("Processing failed for {failure}")]
    PairFailed { failure: PairFailure },

    #[error("{} of {total} pairs failed: indices {}", .failures.len(), format_indices(.failures))]
    BatchFailed {
        total: usize,
        failures: Vec<PairFailure>,
    },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image codec error for {path}")]
    ImageError {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse flow field {path} at line {line}: {reason}")]
    ParseError {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plotting failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl PivError {
    /// 失败图像对序号（仅批处理错误）
    pub fn failed_indices(&self) -> Vec<usize> {
        match self {
            PivError::PairFailed { failure } => vec![failure.index],
            PivError::BatchFailed { failures, .. } => failures.iter().map(|f| f.index).collect(),
            _ => Vec::new(),
        }
    }
}

fn format_indices(failures: &[PairFailure]) -> String {
    failures
        .iter()
        .map(|f| f.index.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PivError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(index: usize) -> PairFailure {
        PairFailure {
            index,
            file_a: PathBuf::from(format!("/data/img_{index:03}_a.png")),
            file_b: PathBuf::from(format!("/data/img_{index:03}_b.png")),
            reason: "boom".to_string(),
        }
    }

    #[test]
    fn test_batch_failed_message_lists_indices() {
        let err = PivError::BatchFailed {
            total: 5,
            failures: vec![failure(1), failure(3)],
        };
        assert_eq!(err.to_string(), "2 of 5 pairs failed: indices 1, 3");
        assert_eq!(err.failed_indices(), vec![1, 3]);
    }

    #[test]
    fn test_pair_failed_names_files() {
        let err = PivError::PairFailed {
            failure: failure(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("pair 2"));
        assert!(msg.contains("img_002_a.png"));
        assert!(msg.contains("boom"));
    }
}
