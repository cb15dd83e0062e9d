//! 文件校验服务 - 业务能力层
//!
//! 只负责判断一个文件能否作为作业图片上传

use regex::Regex;

use crate::error::UploadError;
use crate::models::UploadFile;

/// 接受的 MIME 类型
pub const ACCEPTED_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/png",
    "image/heic",
    "image/heif",
    "image/webp",
    "image/jpg",
];

/// 默认单文件上限 10MB
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const EXTENSION_PATTERN: &str = r"(?i)\.(jpg|jpeg|png|heic|heif|webp)$";

/// 文件校验服务
///
/// MIME 类型或扩展名任一命中即视为图片，然后检查大小
pub struct FileValidator {
    max_bytes: u64,
    extension_re: Regex,
}

impl FileValidator {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            extension_re: Regex::new(EXTENSION_PATTERN).expect("extension pattern is valid"),
        }
    }

    /// 校验单个文件
    pub fn validate(&self, file: &UploadFile) -> Result<(), UploadError> {
        let mime = file.mime_type.to_lowercase();
        if !ACCEPTED_TYPES.contains(&mime.as_str()) && !self.extension_re.is_match(&file.name) {
            return Err(UploadError::UnsupportedType {
                name: file.name.clone(),
            });
        }

        if file.size() > self.max_bytes {
            return Err(UploadError::TooLarge {
                name: file.name.clone(),
                size: file.size(),
                limit_mb: self.max_bytes / (1024 * 1024),
            });
        }

        Ok(())
    }
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(MAX_FILE_SIZE)
    }
}
