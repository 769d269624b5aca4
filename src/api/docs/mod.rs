mod bitable;
mod reference;
mod sheets;
mod wiki;

pub const TRACING_TARGET: &str = "feishu_export::docs";
