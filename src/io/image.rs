//! # 图像读写
//!
//! 灰度图像的读取、保存与取反。编解码由 `image` crate 完成。
//!
//! ## 功能
//! - `imread`: 读取任意支持格式并转换为 8 位灰度，存为 `i32` 灰度值
//! - `imsave`: 保存灰度帧，要求所有值在 `[0, 255]`
//! - `negative`: 计算 `255 - v`
//!
//! ## 依赖关系
//! - 被 `plot/vector_field.rs` 和 `commands/negative.rs` 使用
//! - 使用 `image` crate

use crate::error::{PivError, Result};

use image::GrayImage;
use std::path::Path;

/// 二维灰度帧，按行存储
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<i32>,
}

impl Frame {
    /// 由原始灰度值创建帧
    pub fn new(width: usize, height: usize, data: Vec<i32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(PivError::InvalidArgument(format!(
                "frame data has {} samples, expected {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// 读取 `(x, y)` 处的灰度值
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// 是否所有值都在 8 位灰度范围内
    pub fn is_grey_levels(&self) -> bool {
        self.data.iter().all(|v| (0..=255).contains(v))
    }

    fn to_gray_image(&self) -> Option<GrayImage> {
        let bytes = self.data.iter().map(|&v| v as u8).collect();
        GrayImage::from_raw(self.width as u32, self.height as u32, bytes)
    }
}

/// 读取图像文件为灰度帧
pub fn imread(path: &Path) -> Result<Frame> {
    let img = image::open(path)
        .map_err(|e| PivError::ImageError {
            path: path.display().to_string(),
            source: e,
        })?
        .into_luma8();

    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw().into_iter().map(i32::from).collect();

    Frame::new(width, height, data)
}

/// 保存灰度帧，格式由扩展名决定
pub fn imsave(path: &Path, frame: &Frame) -> Result<()> {
    if !frame.is_grey_levels() {
        return Err(PivError::InvalidArgument(
            "please provide a 2d array of grey levels (value in [0, 255])".to_string(),
        ));
    }

    let img = frame
        .to_gray_image()
        .ok_or_else(|| PivError::Other("frame dimensions do not match its data".to_string()))?;

    img.save(path).map_err(|e| PivError::ImageError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 图像取反（255 - v）
pub fn negative(frame: &Frame) -> Frame {
    Frame {
        width: frame.width,
        height: frame.height,
        data: frame.data.iter().map(|v| 255 - v).collect(),
    }
}
