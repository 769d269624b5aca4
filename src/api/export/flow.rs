use super::TRACING_TARGET;
use crate::api::client::FeishuClient;
use crate::api::models::{ExportJobStatus, ExportResult, ExportTask, ExportedDocument};
use crate::error::{Error, Result};
use std::thread;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_POLLS: u32 = 60;

/// 轮询导出任务状态的参数。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl ExportOptions {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls.max(1);
        self
    }
}

impl FeishuClient {
    /// 轮询单个导出任务直到完成。
    ///
    /// 任务失败返回 [`Error::ExportFailed`]，超过 `max_polls` 次仍未完成返回
    /// [`Error::ExportTimeout`]；状态查询本身出错时立即返回，不重试。
    pub fn wait_for_export(
        &self,
        task: &ExportTask,
        document_token: &str,
        options: &ExportOptions,
        access_token: Option<&str>,
    ) -> Result<ExportResult> {
        let access_token = self.access_token_or_fetch(access_token)?;
        let max_polls = options.max_polls.max(1);

        for attempt in 1..=max_polls {
            let result =
                self.get_export_status(&task.ticket, document_token, Some(&access_token))?;
            match result.status() {
                ExportJobStatus::Success => return Ok(result),
                ExportJobStatus::Failed(job_status) => {
                    return Err(Error::ExportFailed {
                        ticket: task.ticket.clone(),
                        job_status,
                        message: result.job_error_msg.unwrap_or_default(),
                    });
                }
                ExportJobStatus::Initializing
                | ExportJobStatus::Processing
                | ExportJobStatus::Unknown(_) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        ticket = %task.ticket,
                        attempt,
                        job_status = result.job_status,
                        "Export task still running"
                    );
                    if attempt < max_polls {
                        thread::sleep(options.poll_interval);
                    }
                }
            }
        }

        Err(Error::ExportTimeout {
            ticket: task.ticket.clone(),
            polls: max_polls,
        })
    }

    /// 完整导出流程：换取 token、解析链接、创建任务、逐个轮询并下载。
    ///
    /// 单个子任务导出失败时记录日志并跳过，其余错误直接返回。
    pub fn export_document(
        &self,
        url: &str,
        options: &ExportOptions,
    ) -> Result<Vec<ExportedDocument>> {
        let access_token = self.access_token()?;
        let reference = self.parse_document_reference(url, Some(&access_token))?;
        tracing::info!(
            target: TRACING_TARGET,
            token = %reference.token,
            doc_type = %reference.doc_type,
            "Exporting document"
        );

        let tasks =
            self.create_export_task(&reference.token, &reference.doc_type, Some(&access_token))?;
        let mut documents = Vec::with_capacity(tasks.len());
        for task in tasks {
            let waited =
                self.wait_for_export(&task, &reference.token, options, Some(&access_token));
            let result = match waited {
                Ok(result) => result,
                Err(Error::ExportFailed {
                    ticket,
                    job_status,
                    message,
                }) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        ticket = %ticket,
                        job_status,
                        "Export task failed: {}",
                        message
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };

            let file_token = result
                .file_token
                .clone()
                .filter(|token| !token.is_empty())
                .ok_or_else(|| {
                    Error::internal(format!(
                        "export task {} finished without a file token",
                        task.ticket
                    ))
                })?;
            let file = self.download_exported_file(&file_token, Some(&access_token))?;
            documents.push(ExportedDocument { task, result, file });
        }

        tracing::info!(
            target: TRACING_TARGET,
            exported = documents.len(),
            "Document export finished"
        );
        Ok(documents)
    }
}
