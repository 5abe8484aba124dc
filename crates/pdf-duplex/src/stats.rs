use crate::options::DuplexOptions;
use crate::pool::SourceDocument;
use crate::select::select_from_counts;
use crate::types::*;
use std::path::PathBuf;

/// Calculate statistics for a run over documents with the given page counts
pub fn calculate_statistics(
    page_counts: &[usize],
    options: &DuplexOptions,
) -> Result<DuplexStatistics> {
    options.validate()?;

    let mut stats = DuplexStatistics {
        documents: page_counts.len(),
        batches: 0,
        front_sheets: 0,
        back_sheets: 0,
        real_pages: 0,
        blank_substitutions: 0,
    };

    for batch in page_counts.chunks(options.batch_capacity) {
        let selection = select_from_counts(batch);
        stats.batches += 1;
        stats.front_sheets += selection.front.len().div_ceil(2);
        stats.back_sheets += selection.back.len().div_ceil(2);
        stats.real_pages += selection.real_count();
        stats.blank_substitutions += selection.blank_count();
    }

    Ok(stats)
}

/// Count the pages of every input, reporting open failures with the batch
/// the document would belong to
pub async fn collect_page_counts(
    paths: &[PathBuf],
    options: &DuplexOptions,
) -> Result<Vec<usize>> {
    options.validate()?;

    let paths = paths.to_vec();
    let capacity = options.batch_capacity;
    tokio::task::spawn_blocking(move || {
        paths
            .iter()
            .enumerate()
            .map(|(index, path)| {
                SourceDocument::load(path)
                    .map(|doc| doc.page_count())
                    .map_err(|source| DuplexError::DocumentOpen {
                        batch: index / capacity + 1,
                        path: path.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<usize>>>()
    })
    .await?
}
