//! # openpiv-tools - PIV 工作流工具库
//!
//! 读取图像、保存流场结果、绘制矢量场与查询窗口分布，
//! 并将成对的图像文件分发到多个工作线程处理。
//!
//! ## 模块
//! - `batch`  - 图像对收集、校验与顺序 / 并行分发
//! - `io`     - 灰度图像与流场文本文件读写
//! - `plot`   - 矢量场图与查询窗口分布图
//! - `utils`  - 终端输出与进度条
//! - `error`  - 错误处理
//!
//! ## 示例
//! ```no_run
//! use openpiv_tools::batch::{Multiprocessor, WorkItem};
//!
//! let mut multi = Multiprocessor::new("/home/user/images", "image_*_a.bmp", "image_*_b.bmp")?;
//! multi.run(
//!     &|item: &WorkItem| -> anyhow::Result<()> {
//!         let _a = openpiv_tools::io::imread(item.file_a())?;
//!         let _b = openpiv_tools::io::imread(item.file_b())?;
//!         Ok(())
//!     },
//!     4,
//! )?;
//! # Ok::<(), openpiv_tools::PivError>(())
//! ```

pub mod batch;
pub mod error;
pub mod io;
pub mod plot;
pub mod utils;

pub use batch::{BatchReport, CancelToken, Multiprocessor, PairProcessor, WorkItem};
pub use error::{PairFailure, PivError, Result};
