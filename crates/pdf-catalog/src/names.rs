use crate::types::{CatalogError, Result};
use std::path::{Path, PathBuf};

/// Catalog entries from the first column of a CSV file (with header row)
pub async fn load_names_from_csv(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let names = tokio::task::spawn_blocking(move || {
        let mut reader = csv::Reader::from_reader(contents.as_bytes());
        let mut names = Vec::new();

        for result in reader.records() {
            let record = result?;
            if let Some(name) = record.get(0).map(str::trim).filter(|n| !n.is_empty()) {
                names.push(name.to_string());
            }
        }
        Ok::<_, CatalogError>(names)
    })
    .await??;

    Ok(names)
}

/// Catalog entries from document paths: each file name without its extension
pub fn names_from_paths(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect()
}
