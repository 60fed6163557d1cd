//! # 图像对数据模型
//!
//! 定义批处理的最小工作单元 `WorkItem`：(第一帧, 第二帧, 序号)。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 和 `batch/processor.rs` 使用
//! - 无外部模块依赖

use std::path::{Path, PathBuf};

/// 图像对序号（从 0 开始，按发现顺序分配）
pub type PairIndex = usize;

/// 单个工作单元，构造后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    file_a: PathBuf,
    file_b: PathBuf,
    index: PairIndex,
}

impl WorkItem {
    pub fn new(file_a: PathBuf, file_b: PathBuf, index: PairIndex) -> Self {
        Self {
            file_a,
            file_b,
            index,
        }
    }

    /// 第一帧路径
    pub fn file_a(&self) -> &Path {
        &self.file_a
    }

    /// 第二帧路径
    pub fn file_b(&self) -> &Path {
        &self.file_b
    }

    /// 图像对序号
    pub fn index(&self) -> PairIndex {
        self.index
    }

    /// 由序号生成确定的输出文件名，例如 `result_0007.txt`
    pub fn output_name(&self, prefix: &str, ext: &str) -> String {
        format!("{}_{:04}.{}", prefix, self.index, ext)
    }
}

/// 按位置配对两组已排序的文件
pub fn zip_pairs(files_a: &[PathBuf], files_b: &[PathBuf]) -> Vec<WorkItem> {
    files_a
        .iter()
        .zip(files_b)
        .enumerate()
        .map(|(i, (a, b))| WorkItem::new(a.clone(), b.clone(), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_pairs_positional() {
        let a = vec![PathBuf::from("/d/x_000_a.png"), PathBuf::from("/d/x_001_a.png")];
        let b = vec![PathBuf::from("/d/x_000_b.png"), PathBuf::from("/d/x_001_b.png")];

        let items = zip_pairs(&a, &b);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].index(), 1);
        assert_eq!(items[1].file_a(), Path::new("/d/x_001_a.png"));
        assert_eq!(items[1].file_b(), Path::new("/d/x_001_b.png"));
    }

    #[test]
    fn test_output_name() {
        let item = WorkItem::new(PathBuf::from("a"), PathBuf::from("b"), 7);
        assert_eq!(item.output_name("result", "txt"), "result_0007.txt");
    }
}
