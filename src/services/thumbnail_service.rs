//! 缩略图服务 - 业务能力层
//!
//! 只负责"把一张图片缩成预览图"，解码和编码在阻塞线程池中执行

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use crate::error::UploadError;
use crate::models::{Thumbnail, UploadFile};

/// 默认最大宽度
pub const DEFAULT_MAX_WIDTH: u32 = 400;
/// 默认 JPEG 质量
pub const DEFAULT_QUALITY: u8 = 80;

/// 缩略图服务
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailService {
    max_width: u32,
    quality: u8,
}

impl ThumbnailService {
    pub fn new(max_width: u32) -> Self {
        Self {
            max_width: max_width.max(1),
            quality: DEFAULT_QUALITY,
        }
    }

    /// 为单个文件生成缩略图
    pub async fn generate(&self, file: &UploadFile) -> Result<Thumbnail, UploadError> {
        let data = file.data.clone();
        let (max_width, quality) = (self.max_width, self.quality);

        let thumbnail = tokio::task::spawn_blocking(move || render(&data, max_width, quality))
            .await
            .map_err(|e| UploadError::processing(&file.name, e))?
            .map_err(|e| UploadError::processing(&file.name, e))?;

        debug!(
            "生成缩略图 {}: {}x{} ({} 字节)",
            file.name,
            thumbnail.width,
            thumbnail.height,
            thumbnail.jpeg.len()
        );
        Ok(thumbnail)
    }
}

impl Default for ThumbnailService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH)
    }
}

/// 按比例缩放到最大宽度以内，较窄的图片保持原尺寸
pub fn render(data: &[u8], max_width: u32, quality: u8) -> Result<Thumbnail, image::ImageError> {
    let img = image::load_from_memory(data)?;
    let (width, height) = (img.width(), img.height());

    let resized = if width > max_width {
        let scaled_height = scaled_height(width, height, max_width);
        img.resize_exact(max_width, scaled_height, FilterType::Triangle)
    } else {
        img
    };

    // JPEG 不支持透明通道
    let rgb = resized.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality).encode_image(&rgb)?;

    Ok(Thumbnail {
        width: rgb.width(),
        height: rgb.height(),
        jpeg: Bytes::from(jpeg),
    })
}

fn scaled_height(width: u32, height: u32, max_width: u32) -> u32 {
    let scaled = (u64::from(height) * u64::from(max_width) + u64::from(width) / 2) / u64::from(width);
    scaled.max(1) as u32
}
