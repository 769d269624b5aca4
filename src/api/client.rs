use crate::error::{Error, Result};
use crate::settings::FeishuConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{
    blocking::{Client, RequestBuilder},
    redirect::Policy,
    StatusCode,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const TRACING_TARGET: &str = "feishu_export::client";

/// 路径段中保留 token 常见的 `-_.~`，其余字符转义。
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

struct FeishuClientInner {
    http: Client,
    config: FeishuConfig,
}

impl fmt::Debug for FeishuClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeishuClientInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// 飞书开放平台文档导出客户端。
///
/// 不持有可变状态：每个操作接受可选的 tenant access token，缺省时现场换取。
/// 克隆开销很小，可以在线程间共享。
#[derive(Clone, Debug)]
pub struct FeishuClient {
    inner: Arc<FeishuClientInner>,
}

impl FeishuClient {
    pub fn new(config: FeishuConfig) -> Result<Self> {
        config.validate()?;
        let http = build_blocking_client(config.effective_timeout())?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            timeout_ms = config.effective_timeout().as_millis() as u64,
            "Created Feishu client"
        );

        Ok(Self {
            inner: Arc::new(FeishuClientInner { http, config }),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(FeishuConfig::from_env()?)
    }

    pub fn config(&self) -> &FeishuConfig {
        &self.inner.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// 拼接 `base_url` 与 API 路径。
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// 调用方传入 token 时直接使用，否则用应用凭证换取新 token。
    pub(crate) fn access_token_or_fetch(&self, access_token: Option<&str>) -> Result<String> {
        match access_token {
            Some(token) => Ok(token.to_string()),
            None => self.access_token(),
        }
    }

    pub(crate) fn authorized(
        &self,
        request: RequestBuilder,
        access_token: &str,
    ) -> RequestBuilder {
        request
            .bearer_auth(access_token)
            .header("Content-Type", "application/json")
    }

    /// 发送请求并按统一约定解析响应信封。
    pub(crate) fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call: &ApiCall,
    ) -> Result<T> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        interpret_response(status, &body, call)
    }
}

/// 构建一个带有统一超时与重定向策略的阻塞式 HTTP 客户端。
pub(crate) fn build_blocking_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(Policy::limited(10))
        .user_agent(concat!("feishu_export/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::from)
}

pub(crate) fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// 单个接口调用的描述：日志用的动作名，以及该接口表示“无权限”的业务码。
#[derive(Clone, Copy, Debug)]
pub(crate) struct ApiCall {
    pub action: &'static str,
    pub unauthorized_code: Option<i64>,
}

/// 大部分文档接口以 131006 表示应用无权访问文档。
pub(crate) const DOCUMENT_FORBIDDEN_CODE: i64 = 131006;
/// 创建导出任务接口的无权限业务码。
pub(crate) const EXPORT_FORBIDDEN_CODE: i64 = 1069902;

#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// 统一响应约定：
/// HTTP 200 + code 0 返回 `data`；命中无权限码返回 Unauthorized；
/// 其他业务码或非 200 状态均记录日志后返回 Internal。
pub(crate) fn interpret_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    call: &ApiCall,
) -> Result<T> {
    if status != StatusCode::OK {
        tracing::error!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            "{} failed: {}",
            call.action,
            body
        );
        return Err(Error::internal(body));
    }

    let envelope: Envelope = serde_json::from_str(body)?;
    if envelope.code == 0 {
        let data = envelope.data.unwrap_or(serde_json::Value::Null);
        return serde_json::from_value(data).map_err(Error::from);
    }

    if call.unauthorized_code == Some(envelope.code) {
        tracing::warn!(
            target: TRACING_TARGET,
            code = envelope.code,
            "{} rejected: app has no access to the document",
            call.action
        );
        return Err(Error::unauthorized());
    }

    tracing::error!(
        target: TRACING_TARGET,
        code = envelope.code,
        "{} failed: {}",
        call.action,
        envelope.msg
    );
    Err(Error::internal(envelope.msg))
}
