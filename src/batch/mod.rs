//! # 批量处理模块
//!
//! 成对图像文件的收集、校验与分发（Batch Pair Processor）。
//!
//! ## 功能
//! - 两组 glob 模式收集第一帧 / 第二帧
//! - 按位置配对并分配序号
//! - 顺序或并行执行调用方提供的处理函数
//! - 失败汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/` 模块及库调用方使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod pairs;
pub mod processor;
pub mod runner;

pub use collector::FileCollector;
pub use pairs::{PairIndex, WorkItem};
pub use processor::PairProcessor;
pub use runner::{BatchReport, CancelToken, Multiprocessor, ProcessorState};
