//! 飞书开放平台文档导出接口的阻塞式客户端。
//!
//! 覆盖 tenant access token 换取、文档链接解析（含知识库节点跳转）、
//! 导出任务创建与轮询、导出文件下载。
//!
//! ```rust,no_run
//! use feishu_export::{ExportOptions, FeishuClient, FeishuConfig};
//!
//! let client = FeishuClient::new(FeishuConfig::new("cli_xxx", "secret"))?;
//! let token = client.access_token()?;
//! let reference = client.parse_document_reference(
//!     "https://example.feishu.cn/docx/IWGqd3Ww6ob9vlxdcXkcMBESngg",
//!     Some(&token),
//! )?;
//! let tasks =
//!     client.create_export_task(&reference.token, &reference.doc_type, Some(&token))?;
//! let options = ExportOptions::default();
//! for task in &tasks {
//!     let result = client.wait_for_export(task, &reference.token, &options, Some(&token))?;
//!     if let Some(file_token) = result.file_token.as_deref() {
//!         let file = client.download_exported_file(file_token, Some(&token))?;
//!         file.save_to("exports", &result.display_file_name(), true)?;
//!     }
//! }
//! # Ok::<(), feishu_export::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod api;
mod error;
pub mod settings;

pub use api::{
    DocumentReference, DocumentType, ExportJobStatus, ExportOptions, ExportResult, ExportTask,
    ExportedDocument, ExportedFile, FeishuClient, TenantAccessToken, WikiNode,
};
pub use error::{Error, Result, UNAUTHORIZED_MESSAGE, UNSUPPORTED_TYPE_MESSAGE};
pub use settings::{init_logging, FeishuConfig};
