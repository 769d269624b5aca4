use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// 导出文件可能较大，下载单独使用更长的超时。
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_LOG_LEVEL: &str = "info";

const APP_ID_KEY: &str = "FEISHU_APP_ID";
const APP_SECRET_KEY: &str = "FEISHU_APP_SECRET";
const BASE_URL_KEY: &str = "FEISHU_BASE_URL";
const TIMEOUT_KEY: &str = "FEISHU_TIMEOUT_SECS";
const LOG_LEVEL_KEY: &str = "FEISHU_LOG_LEVEL";

/// 应用凭证与客户端参数；构造后只读。
#[derive(Clone)]
pub struct FeishuConfig {
    pub app_id: String,
    pub app_secret: String,
    pub base_url: String,
    pub timeout: Duration,
    pub download_timeout: Duration,
    pub log_level: String,
}

impl fmt::Debug for FeishuConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeishuConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("download_timeout", &self.download_timeout)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl FeishuConfig {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// 从进程环境变量读取凭证及可选覆盖项。
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 与 [`FeishuConfig::from_env`] 相同，但由调用方提供取值函数。
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(required(APP_ID_KEY)?, required(APP_SECRET_KEY)?);

        if let Some(base_url) = non_empty(lookup(BASE_URL_KEY)) {
            config = config.with_base_url(base_url);
        }
        if let Some(raw) = non_empty(lookup(TIMEOUT_KEY)) {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| Error::Config(format!("invalid {TIMEOUT_KEY} value {raw:?}: {e}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(level) = non_empty(lookup(LOG_LEVEL_KEY)) {
            config = config.with_log_level(level);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// 校验凭证非空且 base_url 可解析。
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(Error::Config("app_id is required".to_string()));
        }
        if self.app_secret.trim().is_empty() {
            return Err(Error::Config("app_secret is required".to_string()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid base url {:?}: {e}", self.base_url)))?;
        Ok(())
    }

    /// 超时为 0 时视为未设置，回退到默认值。
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    pub fn effective_download_timeout(&self) -> Duration {
        if self.download_timeout.is_zero() {
            DEFAULT_DOWNLOAD_TIMEOUT
        } else {
            self.download_timeout
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
