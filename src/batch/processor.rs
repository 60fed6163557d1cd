//! # 图像对处理接口
//!
//! 批处理的唯一扩展点：调用方对每个 `WorkItem` 执行自己的处理逻辑
//! （读取两帧、计算、写出结果）。顺序与并行两种分发路径调用同一接口。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `anyhow` 承载调用方的任意错误

use super::pairs::WorkItem;

/// 图像对处理器
///
/// 并行模式下会被多个线程同时调用，因此要求 `Sync`。
/// 输出文件名应由 `WorkItem::index` 推导，不要依赖共享计数器。
pub trait PairProcessor: Sync {
    fn process(&self, item: &WorkItem) -> anyhow::Result<()>;
}

impl<F> PairProcessor for F
where
    F: Fn(&WorkItem) -> anyhow::Result<()> + Sync,
{
    fn process(&self, item: &WorkItem) -> anyhow::Result<()> {
        self(item)
    }
}
