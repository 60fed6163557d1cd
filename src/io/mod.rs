//! # 数据读写模块
//!
//! ## 子模块
//! - `image`: 灰度图像读取、保存与取反
//! - `field`: 流场文本文件的保存与读取
//!
//! ## 依赖关系
//! - 被 `plot/` 和 `commands/` 模块使用

pub mod field;
pub mod image;

pub use self::field::{load, save, FlowField, SaveOptions};
pub use self::image::{imread, imsave, negative, Frame};
