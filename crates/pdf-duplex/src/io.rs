//! Document I/O: input discovery, loading and atomic output writes

use crate::types::*;
use lopdf::Document;
use log::warn;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// List the documents in `dir` whose extension matches `extension`
/// (case-insensitive), sorted by file name.
///
/// A missing directory yields an empty list rather than an error.
pub async fn scan_input_dir(dir: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Input directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if has_extension(&path, extension) && tokio::fs::metadata(&path).await?.is_file() {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Case-insensitive extension check
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Serialize a document to bytes
pub fn document_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Save a document, never leaving partial content under `path`
pub async fn save_pdf(doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let bytes = tokio::task::spawn_blocking(move || document_bytes(doc)).await??;
    write_atomic(path.as_ref(), &bytes).await?;
    Ok(())
}

/// Write `bytes` to a hidden temporary file next to `path`, then rename it
/// into place. The temporary file is removed if any step fails.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp = temp_path_for(path);

    let result = async {
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, path).await
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp).await;
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
