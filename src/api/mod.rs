pub mod auth;
mod client;
pub mod docs;
pub mod export;
mod models;

pub use auth::TenantAccessToken;
pub use client::{FeishuClient, TRACING_TARGET};
pub use export::ExportOptions;
pub use models::{
    DocumentReference, DocumentType, ExportJobStatus, ExportResult, ExportTask, ExportedDocument,
    ExportedFile, WikiNode,
};
