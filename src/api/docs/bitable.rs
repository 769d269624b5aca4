use super::TRACING_TARGET;
use crate::api::client::{encode_segment, ApiCall, FeishuClient, DOCUMENT_FORBIDDEN_CODE};
use crate::error::Result;
use serde::Deserialize;

const LIST_TABLES: ApiCall = ApiCall {
    action: "list bitable tables",
    unauthorized_code: Some(DOCUMENT_FORBIDDEN_CODE),
};

/// 接口允许的最大分页大小。
const PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
struct ListTablesData {
    #[serde(default)]
    items: Vec<TableDto>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableDto {
    table_id: String,
}

impl FeishuClient {
    /// 按服务端顺序返回多维表格下所有数据表 ID，自动翻页。
    pub fn list_bitable_table_ids(
        &self,
        app_token: &str,
        access_token: Option<&str>,
    ) -> Result<Vec<String>> {
        let access_token = self.access_token_or_fetch(access_token)?;
        let url = self.endpoint(&format!("bitable/v1/apps/{}/tables", encode_segment(app_token)));

        let mut table_ids = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self.http().get(&url).query(&[("page_size", PAGE_SIZE)]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("page_token", token)]);
            }

            let page: ListTablesData =
                self.send_json(self.authorized(request, &access_token), &LIST_TABLES)?;
            table_ids.extend(page.items.into_iter().map(|table| table.table_id));

            match page.page_token.filter(|token| !token.is_empty()) {
                Some(next) if page.has_more => page_token = Some(next),
                _ => break,
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            app_token,
            tables = ?table_ids,
            "Listed bitable tables"
        );
        Ok(table_ids)
    }
}
