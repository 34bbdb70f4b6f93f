//! Local file handling for document upload and download.

use campus_core::scholarship::{DocumentBlob, UploadFile};
use campus_core::{PortalError, Result};
use std::path::{Path, PathBuf};

/// Infers the MIME type from a filename extension.
pub fn infer_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

/// Reads a local file into an [`UploadFile`].
pub async fn read_upload(path: &Path) -> Result<UploadFile> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| PortalError::validation("file", "Please choose a file to upload"))?;

    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(PortalError::validation("file", "The selected file is empty"));
    }

    Ok(UploadFile::new(file_name.clone(), infer_mime_type(&file_name), bytes))
}

/// Strips directory components and characters that are unsafe in file names.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

/// File name a downloaded blob should be saved under.
pub fn download_name(blob: &DocumentBlob, document_id: &str) -> String {
    match blob.filename.as_deref() {
        Some(name) if !name.trim().is_empty() => sanitize_file_name(name),
        _ => format!("document-{}", sanitize_file_name(document_id)),
    }
}

/// Writes a downloaded blob into `dir` and returns the final path.
pub async fn save_download(dir: &Path, blob: &DocumentBlob, document_id: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(download_name(blob, document_id));
    tokio::fs::write(&path, &blob.bytes).await?;
    tracing::info!("[Files] Saved {} bytes to {}", blob.bytes.len(), path.display());
    Ok(path)
}
