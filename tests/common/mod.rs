#![allow(dead_code)]

use feishu_export::{FeishuClient, FeishuConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_ID: &str = "cli_test";
pub const APP_SECRET: &str = "secret";
pub const TOKEN: &str = "t-test";

/// 指向 mock server 的客户端；必须在异步运行时之外调用。
pub fn client_for(base_url: &str) -> FeishuClient {
    FeishuClient::new(FeishuConfig::new(APP_ID, APP_SECRET).with_base_url(base_url))
        .expect("client should build")
}

/// 在 tokio 的阻塞线程池中执行客户端调用。
pub async fn blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "msg": "success", "data": data }))
}

pub fn service_error(code: i64, msg: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": code, "msg": msg, "data": {} }))
}

pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/v3/tenant_access_token/internal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "ok",
            "tenant_access_token": token,
            "expire": 7200
        })))
        .mount(server)
        .await;
}
