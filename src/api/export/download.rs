use super::TRACING_TARGET;
use crate::api::client::{encode_segment, FeishuClient};
use crate::api::models::{ExportedFile, EXPORT_FILE_STEM};
use crate::error::{Error, Result};
use reqwest::{header::CONTENT_TYPE, StatusCode};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

impl FeishuClient {
    /// 根据导出结果中的 `file_token` 下载文件，内容整体读入内存。
    pub fn download_exported_file(
        &self,
        file_token: &str,
        access_token: Option<&str>,
    ) -> Result<ExportedFile> {
        let access_token = self.access_token_or_fetch(access_token)?;
        let url = self.endpoint(&format!(
            "drive/v1/export_tasks/file/{}/download",
            encode_segment(file_token)
        ));

        tracing::debug!(target: TRACING_TARGET, file_token, "Downloading exported file");
        let response = self
            .authorized(self.http().get(url), &access_token)
            .timeout(self.config().effective_download_timeout())
            .send()?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text()?;
            tracing::error!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                "download exported file failed: {}",
                body
            );
            return Err(Error::internal(body));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let content = response.bytes()?.to_vec();
        tracing::debug!(
            target: TRACING_TARGET,
            file_token,
            bytes = content.len(),
            "Downloaded exported file"
        );

        Ok(ExportedFile {
            file_token: file_token.to_string(),
            content_type,
            content,
        })
    }
}

impl ExportedFile {
    /// 将文件写入 `target_dir/file_name`，返回最终路径。
    /// 文件名中的路径分隔符等非法字符会被替换；目标已存在且 `overwrite` 为 false 时报错。
    pub fn save_to(
        &self,
        target_dir: impl AsRef<Path>,
        file_name: &str,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let file_name = export_file_name(file_name);
        let destination = prepare_destination(target_dir.as_ref(), &file_name, overwrite)?;

        let file = File::create(&destination)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&self.content)?;
        writer.flush()?;

        tracing::info!(
            target: TRACING_TARGET,
            path = %destination.display(),
            bytes = self.content.len(),
            "Saved exported file"
        );
        Ok(destination)
    }
}

/// 清理导出文件名中的路径分隔符、保留字符与控制字符。
/// 主名为空时使用默认名但保留扩展名，例如 ` .csv` 得到 `export.csv`。
fn export_file_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || RESERVED_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let (stem, extension) = match cleaned.rsplit_once('.') {
        Some((stem, ext)) if !ext.trim().is_empty() => (stem, Some(ext.trim())),
        _ => (cleaned.as_str(), None),
    };
    let stem = stem.trim().trim_matches('.');
    let stem = if stem.is_empty() { EXPORT_FILE_STEM } else { stem };

    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}

fn prepare_destination(dir_path: &Path, file_name: &str, overwrite: bool) -> Result<PathBuf> {
    fs::create_dir_all(dir_path)?;

    let destination = dir_path.join(file_name);
    if destination.exists() && !overwrite {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("文件已存在：{}", destination.display()),
        )));
    }

    Ok(destination)
}
