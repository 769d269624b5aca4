use super::TRACING_TARGET;
use crate::api::client::{ApiCall, FeishuClient, DOCUMENT_FORBIDDEN_CODE};
use crate::api::models::WikiNode;
use crate::error::Result;
use serde::Deserialize;

const GET_NODE: ApiCall = ApiCall {
    action: "get wiki node",
    unauthorized_code: Some(DOCUMENT_FORBIDDEN_CODE),
};

#[derive(Debug, Deserialize)]
struct GetNodeData {
    node: WikiNode,
}

impl FeishuClient {
    /// 获取知识空间节点信息，返回节点挂载的真实文档 token 与类型。
    /// - 请求：`GET /wiki/v2/spaces/get_node?token=...`
    pub fn resolve_wiki_node(&self, token: &str, access_token: Option<&str>) -> Result<WikiNode> {
        let access_token = self.access_token_or_fetch(access_token)?;
        let request = self
            .http()
            .get(self.endpoint("wiki/v2/spaces/get_node"))
            .query(&[("token", token)]);

        let data: GetNodeData =
            self.send_json(self.authorized(request, &access_token), &GET_NODE)?;
        tracing::debug!(
            target: TRACING_TARGET,
            token,
            obj_type = %data.node.obj_type,
            "Resolved wiki node"
        );
        Ok(data.node)
    }
}
