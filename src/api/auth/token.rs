use crate::api::client::{FeishuClient, TRACING_TARGET};
use crate::error::Result;
use serde::{Deserialize, Serialize};

const TOKEN_PATH: &str = "auth/v3/tenant_access_token/internal";

/// 应用身份的 tenant access token；不做过期跟踪，`expire` 仅供参考。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenantAccessToken {
    pub access_token: String,
    pub expire: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TenantTokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TenantTokenResponse {
    tenant_access_token: String,
    #[serde(default)]
    expire: Option<u64>,
}

impl FeishuClient {
    /// 用应用凭证换取 tenant access token。
    ///
    /// 不检查 HTTP 状态和业务码：响应里缺少 `tenant_access_token`
    /// 时以反序列化错误的形式返回。
    pub fn get_tenant_access_token(&self) -> Result<TenantAccessToken> {
        let config = self.config();
        let body = TenantTokenRequest {
            app_id: &config.app_id,
            app_secret: &config.app_secret,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            app_id = %config.app_id,
            "Requesting tenant access token"
        );

        let response = self
            .http()
            .post(self.endpoint(TOKEN_PATH))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;
        let text = response.text()?;
        let payload: TenantTokenResponse = serde_json::from_str(&text)?;

        Ok(TenantAccessToken {
            access_token: payload.tenant_access_token,
            expire: payload.expire,
        })
    }

    /// 只返回 token 字符串，丢弃 `expire`。
    pub fn access_token(&self) -> Result<String> {
        self.get_tenant_access_token().map(|token| token.access_token)
    }
}
