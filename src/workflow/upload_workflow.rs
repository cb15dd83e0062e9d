//! 作业上传流程 - 流程层
//!
//! 职责：
//! - 校验文件并生成缩略图
//! - 新建作业组或向已有作业组追加页面
//! - 页面排序、删除，作业组删除
//! - 错误横幅（保留所有消息，显示最后一条）
//!
//! 所有状态都归 `UploadWorkflow` 独占，通过 `&mut self` 修改

use futures::future::join_all;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{AppError, UploadError, WorkflowError};
use crate::models::{Sheet, Subject, UploadFile, UploadGroup};
use crate::services::{FileValidator, ThumbnailService};
use crate::workflow::until_cancelled;

/// 全局处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Processing,
}

/// 一次 `add_files` 的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddFilesReport {
    /// 接收新页面的作业组；没有文件通过时为 None
    pub group_id: Option<String>,
    /// 新增的页面 ID（按输入顺序）
    pub added_sheet_ids: Vec<String>,
    /// 被拒绝的文件及原因
    pub rejected: Vec<(String, String)>,
}

/// 作业上传流程
pub struct UploadWorkflow {
    groups: Vec<UploadGroup>,
    active_group_id: Option<String>,
    phase: UploadPhase,
    errors: Vec<String>,
    validator: FileValidator,
    thumbnails: ThumbnailService,
}

impl UploadWorkflow {
    pub fn new(validator: FileValidator, thumbnails: ThumbnailService) -> Self {
        Self {
            groups: Vec::new(),
            active_group_id: None,
            phase: UploadPhase::Idle,
            errors: Vec::new(),
            validator,
            thumbnails,
        }
    }

    /// 添加文件
    ///
    /// `target_group_id` 为 None 时新建作业组并打开审阅；否则追加到该组末尾。
    /// 取消时丢弃全部结果，状态保持不变。
    pub async fn add_files(
        &mut self,
        files: Vec<UploadFile>,
        target_group_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<AddFilesReport, AppError> {
        if let Some(group_id) = target_group_id {
            self.group(group_id)?;
        }

        self.phase = UploadPhase::Processing;
        debug!("📥 处理 {} 个文件", files.len());

        let mut report = AddFilesReport::default();
        let mut messages = Vec::new();

        // 1. 校验
        let mut accepted = Vec::with_capacity(files.len());
        for file in files {
            match self.validator.validate(&file) {
                Ok(()) => accepted.push(file),
                Err(e) => {
                    warn!("⚠️ 文件被拒绝: {}", e);
                    messages.push(e.to_string());
                    report.rejected.push((file.name.clone(), e.to_string()));
                }
            }
        }

        // 2. 并发生成缩略图，结果按输入顺序返回
        let thumbnails = self.thumbnails;
        let pending = join_all(accepted.iter().map(|file| thumbnails.generate(file)));
        let Some(results) = until_cancelled(cancel, pending).await else {
            self.phase = UploadPhase::Idle;
            debug!("上传处理已取消，丢弃 {} 个文件的结果", accepted.len());
            return Err(UploadError::Cancelled.into());
        };

        let mut sheets = Vec::with_capacity(accepted.len());
        for (file, result) in accepted.into_iter().zip(results) {
            match result {
                Ok(thumbnail) => sheets.push(Sheet::new(file, thumbnail)),
                Err(e) => {
                    warn!("⚠️ 缩略图生成失败 {}: {:?}", file.name, e);
                    messages.push(e.to_string());
                    report.rejected.push((file.name, e.to_string()));
                }
            }
        }

        // 3. 提交
        self.phase = UploadPhase::Idle;
        self.errors.extend(messages);

        if sheets.is_empty() {
            debug!("没有文件通过处理，状态不变");
            return Ok(report);
        }

        report.added_sheet_ids = sheets.iter().map(|s| s.id.clone()).collect();

        match target_group_id {
            Some(group_id) => {
                let group = self.group_mut(group_id)?;
                group.sheets.extend(sheets);
                info!(
                    "✓ 作业组 {} 追加 {} 页，共 {} 页",
                    group_id,
                    report.added_sheet_ids.len(),
                    group.sheet_count()
                );
                report.group_id = Some(group_id.to_string());
            }
            None => {
                let group = UploadGroup::new(sheets);
                info!("✓ 新建作业组 {} ({} 页)", group.id, group.sheet_count());
                report.group_id = Some(group.id.clone());
                self.active_group_id = Some(group.id.clone());
                self.groups.push(group);
            }
        }

        Ok(report)
    }

    /// 整体替换页面顺序，新顺序必须是当前页面 ID 的一个排列
    pub fn reorder_sheets(&mut self, group_id: &str, new_order: &[String]) -> Result<(), WorkflowError> {
        let group = self.group_mut(group_id)?;

        let current: HashSet<&str> = group.sheets.iter().map(|s| s.id.as_str()).collect();
        let proposed: HashSet<&str> = new_order.iter().map(String::as_str).collect();
        if new_order.len() != group.sheets.len() || proposed.len() != new_order.len() || proposed != current {
            return Err(WorkflowError::InvalidOrder {
                group_id: group_id.to_string(),
            });
        }

        let mut remaining = std::mem::take(&mut group.sheets);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in new_order {
            if let Some(pos) = remaining.iter().position(|s| &s.id == id) {
                reordered.push(remaining.swap_remove(pos));
            }
        }
        group.sheets = reordered;
        Ok(())
    }

    /// 把一页从 `from` 移到 `to`，越界时忽略
    pub fn move_sheet(&mut self, group_id: &str, from: usize, to: usize) -> Result<(), WorkflowError> {
        let group = self.group_mut(group_id)?;
        let len = group.sheets.len();
        if from >= len || to >= len || from == to {
            return Ok(());
        }

        let sheet = group.sheets.remove(from);
        group.sheets.insert(to, sheet);
        Ok(())
    }

    /// 删除一页；只剩一页时拒绝
    pub fn delete_sheet(&mut self, group_id: &str, sheet_id: &str) -> Result<Sheet, WorkflowError> {
        let group = self.group_mut(group_id)?;
        let Some(pos) = group.sheets.iter().position(|s| s.id == sheet_id) else {
            return Err(WorkflowError::SheetNotFound {
                group_id: group_id.to_string(),
                sheet_id: sheet_id.to_string(),
            });
        };

        if group.sheets.len() == 1 {
            return Err(WorkflowError::LastSheet {
                group_id: group_id.to_string(),
            });
        }

        Ok(group.sheets.remove(pos))
    }

    /// 删除整个作业组；正在审阅时关闭审阅
    pub fn delete_group(&mut self, group_id: &str) -> Result<UploadGroup, WorkflowError> {
        let pos = self
            .groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or_else(|| WorkflowError::GroupNotFound {
                group_id: group_id.to_string(),
            })?;

        if self.active_group_id.as_deref() == Some(group_id) {
            self.active_group_id = None;
        }

        info!("🗑️ 删除作业组 {}", group_id);
        Ok(self.groups.remove(pos))
    }

    pub fn open_review(&mut self, group_id: &str) -> Result<(), WorkflowError> {
        self.group(group_id)?;
        self.active_group_id = Some(group_id.to_string());
        Ok(())
    }

    pub fn close_review(&mut self) {
        self.active_group_id = None;
    }

    /// 正在审阅的作业组
    pub fn active_group(&self) -> Option<&UploadGroup> {
        let id = self.active_group_id.as_deref()?;
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn assign_class(&mut self, group_id: &str, class_id: Option<String>) -> Result<(), WorkflowError> {
        self.group_mut(group_id)?.class_id = class_id;
        Ok(())
    }

    pub fn assign_subject(&mut self, group_id: &str, subject: Option<Subject>) -> Result<(), WorkflowError> {
        self.group_mut(group_id)?.subject = subject;
        Ok(())
    }

    pub fn groups(&self) -> &[UploadGroup] {
        &self.groups
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    /// 横幅显示的错误（最后一条）
    pub fn error_message(&self) -> Option<&str> {
        self.errors.last().map(String::as_str)
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// 记录一条横幅错误（例如调用方读取文件失败）
    pub fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("⚠️ {}", message);
        self.errors.push(message);
    }

    pub fn dismiss_error(&mut self) {
        self.errors.clear();
    }

    pub fn group(&self, group_id: &str) -> Result<&UploadGroup, WorkflowError> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| WorkflowError::GroupNotFound {
                group_id: group_id.to_string(),
            })
    }

    fn group_mut(&mut self, group_id: &str) -> Result<&mut UploadGroup, WorkflowError> {
        self.groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| WorkflowError::GroupNotFound {
                group_id: group_id.to_string(),
            })
    }
}

impl Default for UploadWorkflow {
    fn default() -> Self {
        Self::new(FileValidator::default(), ThumbnailService::default())
    }
}
