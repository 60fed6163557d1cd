//! # 批量执行器
//!
//! 收集、校验并分发成对的图像文件。
//!
//! ## 功能
//! - 两组 glob 模式分别收集并排序，按位置配对
//! - 构造时校验：无匹配文件、数量不一致均直接报错
//! - `workers == 1`：在调用线程中按序号顺序执行，遇错立即返回（调试用）
//! - `workers > 1`：固定大小的 rayon 线程池并行执行，收集全部失败后统一报告
//! - 可选进度条与协作式取消
//!
//! ## 依赖关系
//! - 使用 `batch/collector.rs` 收集文件
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use super::collector::FileCollector;
use super::pairs::{zip_pairs, WorkItem};
use super::processor::PairProcessor;
use crate::error::{PairFailure, PivError, Result};
use crate::utils::progress;

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 执行器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// 已完成校验，等待执行
    Constructed,
    /// 至少执行过一次 `run`
    Completed,
}

/// 协作式取消令牌
///
/// 取消后尚未开始的图像对会被跳过，正在执行的不受影响。
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// 单个图像对的执行结果
#[derive(Debug, Clone)]
enum PairOutcome {
    Done,
    Cancelled,
    Failed(PairFailure),
}

/// 批量处理结果统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// 图像对总数
    pub total: usize,
    /// 成功数量
    pub succeeded: usize,
    /// 因取消而跳过的数量
    pub cancelled: usize,
}

impl BatchReport {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// 是否所有图像对都已处理
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.total
    }
}

/// 图像对批处理器
pub struct Multiprocessor {
    base_dir: PathBuf,
    files_a: Vec<PathBuf>,
    files_b: Vec<PathBuf>,
    items: Vec<WorkItem>,
    show_progress: bool,
    state: ProcessorState,
}

impl Multiprocessor {
    /// 在 `data_dir` 下按两组模式收集第一帧与第二帧并配对
    ///
    /// # Errors
    /// - `InvalidPattern`: 模式语法错误
    /// - `NoFilesFound`: 任一模式没有匹配文件
    /// - `MismatchedCount`: 两组文件数量不一致
    pub fn new(data_dir: impl AsRef<Path>, pattern_a: &str, pattern_b: &str) -> Result<Self> {
        let collector = FileCollector::new(data_dir.as_ref())?;
        let files_a = collector.collect(pattern_a)?;
        let files_b = collector.collect(pattern_b)?;

        if files_a.is_empty() {
            return Err(PivError::NoFilesFound {
                pattern: pattern_a.to_string(),
            });
        }
        if files_b.is_empty() {
            return Err(PivError::NoFilesFound {
                pattern: pattern_b.to_string(),
            });
        }
        if files_a.len() != files_b.len() {
            return Err(PivError::MismatchedCount {
                count_a: files_a.len(),
                count_b: files_b.len(),
            });
        }

        let items = zip_pairs(&files_a, &files_b);
        log::info!(
            "Found {} image pairs in {}",
            items.len(),
            collector.base_dir().display()
        );

        Ok(Self {
            base_dir: collector.base_dir().to_path_buf(),
            files_a,
            files_b,
            items,
            show_progress: false,
            state: ProcessorState::Constructed,
        })
    }

    /// 设置是否显示进度条
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// 数据目录（绝对路径）
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 第一帧文件列表（已排序）
    pub fn files_a(&self) -> &[PathBuf] {
        &self.files_a
    }

    /// 第二帧文件列表（已排序）
    pub fn files_b(&self) -> &[PathBuf] {
        &self.files_b
    }

    /// 按序号排列的全部工作单元
    pub fn work_items(&self) -> &[WorkItem] {
        &self.items
    }

    /// 图像对数量
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// 对每个图像对执行 `processor`
    ///
    /// `workers == 1` 时顺序执行并在首个失败处返回 `PairFailed`；
    /// `workers > 1` 时并行执行全部图像对，若有失败则返回 `BatchFailed`。
    pub fn run<P>(&mut self, processor: &P, workers: usize) -> Result<BatchReport>
    where
        P: PairProcessor + ?Sized,
    {
        self.run_with_cancel(processor, workers, &CancelToken::new())
    }

    /// 同 `run`，但在每个图像对开始前检查取消令牌
    pub fn run_with_cancel<P>(
        &mut self,
        processor: &P,
        workers: usize,
        cancel: &CancelToken,
    ) -> Result<BatchReport>
    where
        P: PairProcessor + ?Sized,
    {
        if workers == 0 {
            return Err(PivError::InvalidArgument(
                "worker count must be a positive integer".to_string(),
            ));
        }

        self.state = ProcessorState::Completed;

        let pb = if self.show_progress {
            progress::create_progress_bar(self.items.len() as u64, "Processing pairs")
        } else {
            ProgressBar::hidden()
        };

        let result = if workers == 1 {
            self.run_sequential(processor, cancel, &pb)
        } else {
            self.run_parallel(processor, workers, cancel, &pb)
        };

        pb.finish_and_clear();
        result
    }

    /// 顺序执行，遇错即停
    fn run_sequential<P>(
        &self,
        processor: &P,
        cancel: &CancelToken,
        pb: &ProgressBar,
    ) -> Result<BatchReport>
    where
        P: PairProcessor + ?Sized,
    {
        log::info!("Processing {} pairs sequentially", self.items.len());

        let mut report = BatchReport::new(self.items.len());
        for item in &self.items {
            if cancel.is_cancelled() {
                report.cancelled += 1;
                continue;
            }

            log::debug!("Processing pair {}", item.index());
            if let Err(e) = processor.process(item) {
                log::warn!("Pair {} failed: {:#}", item.index(), e);
                return Err(PivError::PairFailed {
                    failure: failure_for(item, format!("{:#}", e)),
                });
            }

            report.succeeded += 1;
            pb.inc(1);
        }

        Ok(report)
    }

    /// 在固定大小线程池中并行执行，收集所有失败
    fn run_parallel<P>(
        &self,
        processor: &P,
        workers: usize,
        cancel: &CancelToken,
        pb: &ProgressBar,
    ) -> Result<BatchReport>
    where
        P: PairProcessor + ?Sized,
    {
        log::info!(
            "Processing {} pairs with {} workers",
            self.items.len(),
            workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("piv-worker-{}", i))
            .build()
            .map_err(|e| PivError::Other(format!("Failed to build worker pool: {}", e)))?;

        let outcomes: Vec<PairOutcome> = pool.install(|| {
            self.items
                .par_iter()
                .map(|item| {
                    let outcome = process_guarded(processor, item, cancel);
                    if !matches!(outcome, PairOutcome::Cancelled) {
                        pb.inc(1);
                    }
                    outcome
                })
                .collect()
        });

        // 汇总结果
        let mut report = BatchReport::new(self.items.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                PairOutcome::Done => report.succeeded += 1,
                PairOutcome::Cancelled => report.cancelled += 1,
                PairOutcome::Failed(failure) => failures.push(failure),
            }
        }

        if failures.is_empty() {
            Ok(report)
        } else {
            failures.sort_by_key(|f| f.index);
            Err(PivError::BatchFailed {
                total: report.total,
                failures,
            })
        }
    }
}

/// 执行单个图像对，并将 panic 转换为失败记录
fn process_guarded<P>(processor: &P, item: &WorkItem, cancel: &CancelToken) -> PairOutcome
where
    P: PairProcessor + ?Sized,
{
    if cancel.is_cancelled() {
        return PairOutcome::Cancelled;
    }

    log::debug!("Processing pair {}", item.index());
    match panic::catch_unwind(AssertUnwindSafe(|| processor.process(item))) {
        Ok(Ok(())) => PairOutcome::Done,
        Ok(Err(e)) => {
            log::warn!("Pair {} failed: {:#}", item.index(), e);
            PairOutcome::Failed(failure_for(item, format!("{:#}", e)))
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            log::warn!("Pair {} panicked: {}", item.index(), reason);
            PairOutcome::Failed(failure_for(item, format!("panicked: {}", reason)))
        }
    }
}

fn failure_for(item: &WorkItem, reason: String) -> PairFailure {
    PairFailure {
        index: item.index(),
        file_a: item.file_a().to_path_buf(),
        file_b: item.file_b().to_path_buf(),
        reason,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
