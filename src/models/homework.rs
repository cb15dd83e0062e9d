//! 作业上传模型
//!
//! 一组作业（UploadGroup）代表一名学生提交的若干页扫描件（Sheet）。
//! 这些数据只存在于内存中，进程退出即丢弃。

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::models::subject::Subject;

/// 待上传的文件
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// 从本地文件读取，MIME 类型按扩展名推断
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime_type = mime_from_extension(&name).unwrap_or("application/octet-stream");
        Ok(Self::new(name, mime_type, data))
    }

    /// 文件字节数
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

fn mime_from_extension(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// 缩略图（JPEG 编码）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub jpeg: Bytes,
}

/// 单页作业
#[derive(Debug, Clone)]
pub struct Sheet {
    pub id: String,
    pub file: UploadFile,
    pub thumbnail: Thumbnail,
}

impl Sheet {
    pub fn new(file: UploadFile, thumbnail: Thumbnail) -> Self {
        Self {
            id: generate_id("sheet"),
            file,
            thumbnail,
        }
    }
}

/// 一名学生的一组作业
#[derive(Debug, Clone)]
pub struct UploadGroup {
    pub id: String,
    pub sheets: Vec<Sheet>,
    pub created_at: DateTime<Utc>,
    /// 关联班级
    pub class_id: Option<String>,
    /// 关联科目
    pub subject: Option<Subject>,
}

impl UploadGroup {
    /// 创建作业组，至少需要一页
    pub(crate) fn new(sheets: Vec<Sheet>) -> Self {
        debug_assert!(!sheets.is_empty());
        Self {
            id: generate_id("homework"),
            sheets,
            created_at: Utc::now(),
            class_id: None,
            subject: None,
        }
    }

    pub fn sheet_ids(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }
}

/// 生成本地 ID：时间戳 + 随机后缀
pub(crate) fn generate_id(prefix: &str) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), &random[..9])
}
