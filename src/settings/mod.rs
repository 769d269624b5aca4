mod app_config;
mod logging;

pub use app_config::{
    FeishuConfig, DEFAULT_BASE_URL, DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_LOG_LEVEL, DEFAULT_TIMEOUT,
};
pub use logging::init_logging;
