use crate::api::client::{encode_segment, ApiCall, FeishuClient, DOCUMENT_FORBIDDEN_CODE};
use crate::error::Result;
use serde::Deserialize;

const QUERY_SHEETS: ApiCall = ApiCall {
    action: "query spreadsheet sheets",
    unauthorized_code: Some(DOCUMENT_FORBIDDEN_CODE),
};

#[derive(Debug, Deserialize)]
struct QuerySheetsData {
    #[serde(default)]
    sheets: Vec<SheetDto>,
}

#[derive(Debug, Deserialize)]
struct SheetDto {
    sheet_id: String,
}

impl FeishuClient {
    /// 按服务端顺序返回电子表格下所有工作表 ID。
    pub fn list_sheet_ids(
        &self,
        spreadsheet_token: &str,
        access_token: Option<&str>,
    ) -> Result<Vec<String>> {
        let access_token = self.access_token_or_fetch(access_token)?;
        let url = self.endpoint(&format!(
            "sheets/v3/spreadsheets/{}/sheets/query",
            encode_segment(spreadsheet_token)
        ));
        let request = self.authorized(self.http().get(url), &access_token);

        let data: QuerySheetsData = self.send_json(request, &QUERY_SHEETS)?;
        Ok(data.sheets.into_iter().map(|sheet| sheet.sheet_id).collect())
    }
}
