use serde::Deserialize;
use std::fmt;

/// 文档类型；未识别的 URL 段原样保存在 `Other` 中。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Docx,
    Doc,
    Sheet,
    Sheets,
    Bitable,
    Base,
    Wiki,
    Other(String),
}

impl DocumentType {
    pub fn as_str(&self) -> &str {
        match self {
            DocumentType::Docx => "docx",
            DocumentType::Doc => "doc",
            DocumentType::Sheet => "sheet",
            DocumentType::Sheets => "sheets",
            DocumentType::Bitable => "bitable",
            DocumentType::Base => "base",
            DocumentType::Wiki => "wiki",
            DocumentType::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for DocumentType {
    fn from(raw: &str) -> Self {
        match raw {
            "docx" => DocumentType::Docx,
            "doc" => DocumentType::Doc,
            "sheet" => DocumentType::Sheet,
            "sheets" => DocumentType::Sheets,
            "bitable" => DocumentType::Bitable,
            "base" => DocumentType::Base,
            "wiki" => DocumentType::Wiki,
            other => DocumentType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 从文档链接解析出的 token 与类型。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentReference {
    pub token: String,
    pub doc_type: DocumentType,
}

/// 知识空间节点指向的真实文档。
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WikiNode {
    pub obj_token: String,
    pub obj_type: String,
}

/// 一个导出任务的句柄。`sub_id` 为分表/子表 ID，整篇文档导出时为空。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportTask {
    pub ticket: String,
    pub sub_id: Option<String>,
}

/// 导出结果缺少文件名时使用的默认文件名。
pub(crate) const EXPORT_FILE_STEM: &str = "export";

/// 导出任务状态接口返回的 `result` 对象。
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ExportResult {
    #[serde(default)]
    pub file_extension: Option<String>,
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_token: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub job_error_msg: Option<String>,
    pub job_status: i64,
}

impl ExportResult {
    pub fn status(&self) -> ExportJobStatus {
        ExportJobStatus::from(self.job_status)
    }

    /// `file_name.file_extension`，用于落盘时的默认文件名。
    pub fn display_file_name(&self) -> String {
        let stem = self
            .file_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(EXPORT_FILE_STEM);
        match self.file_extension.as_deref() {
            Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
            _ => stem.to_string(),
        }
    }
}

/// `job_status` 的含义：0 完成，1 初始化，2 处理中，大于 2 为失败码。
/// 负数不属于已知状态，记为 `Unknown` 并按未完成处理，继续轮询。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportJobStatus {
    Success,
    Initializing,
    Processing,
    Failed(i64),
    Unknown(i64),
}

impl ExportJobStatus {
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            ExportJobStatus::Initializing
                | ExportJobStatus::Processing
                | ExportJobStatus::Unknown(_)
        )
    }
}

impl From<i64> for ExportJobStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => ExportJobStatus::Success,
            1 => ExportJobStatus::Initializing,
            2 => ExportJobStatus::Processing,
            failed if failed > 2 => ExportJobStatus::Failed(failed),
            unknown => ExportJobStatus::Unknown(unknown),
        }
    }
}

/// 下载得到的导出文件，内容保存在内存中。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_token: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

/// 一次完整导出流程中单个子任务的产物。
#[derive(Clone, Debug)]
pub struct ExportedDocument {
    pub task: ExportTask,
    pub result: ExportResult,
    pub file: ExportedFile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_round_trips_known_and_unknown_segments() {
        assert_eq!(DocumentType::from("docx"), DocumentType::Docx);
        assert_eq!(DocumentType::from("base"), DocumentType::Base);
        let other = DocumentType::from("mindnote");
        assert_eq!(other, DocumentType::Other("mindnote".to_string()));
        assert_eq!(other.to_string(), "mindnote");
    }

    #[test]
    fn job_status_codes_map_to_states() {
        assert_eq!(ExportJobStatus::from(0), ExportJobStatus::Success);
        assert!(ExportJobStatus::from(1).is_pending());
        assert!(ExportJobStatus::from(2).is_pending());
        assert_eq!(ExportJobStatus::from(110), ExportJobStatus::Failed(110));
        assert!(!ExportJobStatus::from(3).is_pending());
    }

    #[test]
    fn negative_job_status_keeps_polling() {
        assert_eq!(ExportJobStatus::from(-1), ExportJobStatus::Unknown(-1));
        assert!(ExportJobStatus::from(-1).is_pending());
        assert!(ExportJobStatus::from(i64::MIN).is_pending());
    }

    #[test]
    fn export_result_decodes_service_payload() {
        let raw = r#"{
            "file_extension": "csv",
            "type": "sheet",
            "file_name": "Q3 budget",
            "file_token": "boxcnabc",
            "file_size": 2048,
            "job_error_msg": "success",
            "job_status": 0
        }"#;
        let result: ExportResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.status(), ExportJobStatus::Success);
        assert_eq!(result.doc_type.as_deref(), Some("sheet"));
        assert_eq!(result.display_file_name(), "Q3 budget.csv");
    }

    #[test]
    fn pending_result_without_file_fields_decodes() {
        let result: ExportResult = serde_json::from_str(r#"{"job_status": 2}"#).unwrap();
        assert!(result.status().is_pending());
        assert!(result.file_token.is_none());
        assert_eq!(result.display_file_name(), "export");
    }
}
