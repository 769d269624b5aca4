mod download;
mod flow;
mod status;
mod task;

pub use flow::ExportOptions;

pub const TRACING_TARGET: &str = "feishu_export::export";
