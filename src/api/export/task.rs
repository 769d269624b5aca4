use super::TRACING_TARGET;
use crate::api::client::{ApiCall, FeishuClient, EXPORT_FORBIDDEN_CODE};
use crate::api::models::{DocumentType, ExportTask};
use crate::error::{Error, Result, UNSUPPORTED_TYPE_MESSAGE};
use serde::{Deserialize, Serialize};

const CREATE_EXPORT_TASK: ApiCall = ApiCall {
    action: "create export task",
    unauthorized_code: Some(EXPORT_FORBIDDEN_CODE),
};

#[derive(Debug, Serialize)]
struct CreateExportRequest<'a> {
    file_extension: &'a str,
    token: &'a str,
    #[serde(rename = "type")]
    doc_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreateExportData {
    ticket: String,
}

impl FeishuClient {
    /// 为文档创建导出任务。
    ///
    /// - docx / doc：导出整篇文档为 docx，返回一个任务。
    /// - bitable：每个数据表导出一个 csv 任务。
    /// - sheet / sheets：每个工作表导出一个 csv 任务。
    ///
    /// 其他类型在发出任何请求前即返回 Internal 错误。任一子任务失败会中止整批。
    pub fn create_export_task(
        &self,
        document_token: &str,
        doc_type: &DocumentType,
        access_token: Option<&str>,
    ) -> Result<Vec<ExportTask>> {
        let (file_extension, export_type) = match doc_type {
            DocumentType::Docx | DocumentType::Doc => ("docx", doc_type.as_str()),
            DocumentType::Bitable => ("csv", "bitable"),
            DocumentType::Sheet | DocumentType::Sheets => ("csv", "sheet"),
            other => {
                tracing::error!(
                    target: TRACING_TARGET,
                    doc_type = %other,
                    "Unsupported document type"
                );
                return Err(Error::internal(UNSUPPORTED_TYPE_MESSAGE));
            }
        };

        let access_token = self.access_token_or_fetch(access_token)?;
        let sub_ids: Vec<Option<String>> = match doc_type {
            DocumentType::Bitable => self
                .list_bitable_table_ids(document_token, Some(&access_token))?
                .into_iter()
                .map(Some)
                .collect(),
            DocumentType::Sheet | DocumentType::Sheets => self
                .list_sheet_ids(document_token, Some(&access_token))?
                .into_iter()
                .map(Some)
                .collect(),
            _ => vec![None],
        };

        let mut tasks = Vec::with_capacity(sub_ids.len());
        for sub_id in sub_ids {
            let body = CreateExportRequest {
                file_extension,
                token: document_token,
                doc_type: export_type,
                sub_id: sub_id.as_deref(),
            };
            let ticket = self.submit_export_task(&body, &access_token)?;
            tracing::debug!(
                target: TRACING_TARGET,
                ticket = %ticket,
                sub_id = ?sub_id,
                "Created export task"
            );
            tasks.push(ExportTask { ticket, sub_id });
        }

        tracing::info!(
            target: TRACING_TARGET,
            document_token,
            doc_type = %doc_type,
            tasks = tasks.len(),
            "Export tasks created"
        );
        Ok(tasks)
    }

    fn submit_export_task(
        &self,
        body: &CreateExportRequest<'_>,
        access_token: &str,
    ) -> Result<String> {
        let request = self
            .http()
            .post(self.endpoint("drive/v1/export_tasks"))
            .json(body);
        let data: CreateExportData =
            self.send_json(self.authorized(request, access_token), &CREATE_EXPORT_TASK)?;
        Ok(data.ticket)
    }
}
