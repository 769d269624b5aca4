use super::FeishuConfig;
use tracing_subscriber::EnvFilter;

/// 安装 fmt 订阅者；`RUST_LOG` 优先，否则使用配置中的日志级别。
/// 已安装过订阅者时返回 false，不会覆盖宿主程序的设置。
pub fn init_logging(config: &FeishuConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(super::DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
