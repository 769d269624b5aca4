use super::TRACING_TARGET;
use crate::api::client::FeishuClient;
use crate::api::models::{DocumentReference, DocumentType};
use crate::error::{Error, Result};

impl DocumentReference {
    /// 按 `/` 切分链接：倒数第二段为类型，最后一段为 token（去掉 `?` 之后的查询串）。
    /// `base` 归一为 `bitable`；`wiki` 原样保留，由 [`FeishuClient::parse_document_reference`] 继续解析。
    ///
    /// 例：`https://example.feishu.cn/docx/IWGqd3Ww6ob9vlxdcXkcMBESngg`
    pub fn from_url(url: &str) -> Result<Self> {
        let parts: Vec<&str> = url.trim().split('/').collect();
        if parts.len() < 2 {
            return Err(Error::InvalidUrl(url.to_string()));
        }

        let raw_type = parts[parts.len() - 2];
        let raw_token = parts[parts.len() - 1];
        let token = raw_token
            .split_once('?')
            .map_or(raw_token, |(token, _)| token);
        if token.is_empty() {
            return Err(Error::InvalidUrl(url.to_string()));
        }

        let doc_type = match DocumentType::from(raw_type) {
            DocumentType::Base => DocumentType::Bitable,
            other => other,
        };

        Ok(DocumentReference {
            token: token.to_string(),
            doc_type,
        })
    }
}

impl FeishuClient {
    /// 解析文档链接；知识库链接会调用节点接口换成真实文档的 token 与类型。
    pub fn parse_document_reference(
        &self,
        url: &str,
        access_token: Option<&str>,
    ) -> Result<DocumentReference> {
        let reference = DocumentReference::from_url(url)?;
        if reference.doc_type != DocumentType::Wiki {
            return Ok(reference);
        }

        tracing::debug!(target: TRACING_TARGET, token = %reference.token, "Resolving wiki link");
        let node = self.resolve_wiki_node(&reference.token, access_token)?;
        Ok(DocumentReference {
            token: node.obj_token,
            doc_type: DocumentType::from(node.obj_type.as_str()),
        })
    }
}
