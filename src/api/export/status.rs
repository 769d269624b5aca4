use crate::api::client::{encode_segment, ApiCall, FeishuClient};
use crate::api::models::ExportResult;
use crate::error::Result;
use serde::Deserialize;

const GET_EXPORT_TASK: ApiCall = ApiCall {
    action: "get export task status",
    unauthorized_code: None,
};

#[derive(Debug, Deserialize)]
struct ExportTaskData {
    result: ExportResult,
}

impl FeishuClient {
    /// 查询导出任务状态；任务完成后结果中带有 `file_token`。
    pub fn get_export_status(
        &self,
        ticket: &str,
        document_token: &str,
        access_token: Option<&str>,
    ) -> Result<ExportResult> {
        let access_token = self.access_token_or_fetch(access_token)?;
        let url = self.endpoint(&format!("drive/v1/export_tasks/{}", encode_segment(ticket)));
        let request = self.http().get(url).query(&[("token", document_token)]);

        let data: ExportTaskData =
            self.send_json(self.authorized(request, &access_token), &GET_EXPORT_TASK)?;
        Ok(data.result)
    }
}
