//! Batch partitioning and the per-batch pipeline
//!
//! Inputs are split into fixed-size batches. Each batch goes through:
//! 1. Open a document pool
//! 2. Select front and back pairs
//! 3. Reverse the back pairs by document
//! 4. Compose both lists into landscape sheets
//! 5. Write `first_pages_group_<N>` and `last_pages_group_<N>`

use crate::compose::compose_sheets;
use crate::io::{document_bytes, write_atomic};
use crate::options::DuplexOptions;
use crate::pool::DocumentPool;
use crate::reverse::reverse_pairs;
use crate::select::select_pages;
use crate::types::*;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Serialized output of one batch, ready to be written
#[derive(Debug)]
pub struct ImposedBatch {
    pub ordinal: usize,
    pub documents: usize,
    /// `None` when the front list is empty
    pub front: Option<Vec<u8>>,
    /// `None` when the back list is empty
    pub back: Option<Vec<u8>>,
    pub front_sheets: usize,
    pub back_sheets: usize,
    pub blank_substitutions: usize,
}

/// Run the pipeline for one batch in memory.
///
/// The batch's pool lives only inside this call, so its documents are
/// released however the call ends.
pub fn impose_batch(
    ordinal: usize,
    paths: &[PathBuf],
    options: &DuplexOptions,
) -> Result<ImposedBatch> {
    let pool = DocumentPool::open(ordinal, paths, options.blank_page)?;
    impose_pool(&pool, options)
}

/// Run selection, reversal and composition over an opened pool
pub fn impose_pool(pool: &DocumentPool, options: &DuplexOptions) -> Result<ImposedBatch> {
    let selection = select_pages(pool);
    let back = reverse_pairs(&selection.back);
    debug!(
        "batch {}: {} front and {} back entries, {} blank",
        pool.batch(),
        selection.front.len(),
        back.len(),
        selection.blank_count()
    );

    let (front_bytes, front_sheets) = if selection.front.is_empty() {
        (None, 0)
    } else {
        let doc = compose_sheets(pool, &selection.front, &options.sheet)?;
        let sheets = doc.get_pages().len();
        (Some(document_bytes(doc)?), sheets)
    };

    let (back_bytes, back_sheets) = if back.is_empty() {
        (None, 0)
    } else {
        let doc = compose_sheets(pool, &back, &options.sheet)?;
        let sheets = doc.get_pages().len();
        (Some(document_bytes(doc)?), sheets)
    };

    Ok(ImposedBatch {
        ordinal: pool.batch(),
        documents: pool.len(),
        front: front_bytes,
        back: back_bytes,
        front_sheets,
        back_sheets,
        blank_substitutions: selection.blank_count(),
    })
}

/// Drives batches over a resolved list of input documents
#[derive(Debug, Clone)]
pub struct BatchImposer {
    options: DuplexOptions,
}

impl BatchImposer {
    pub fn new(options: DuplexOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &DuplexOptions {
        &self.options
    }

    /// Number of batches `documents` inputs are split into
    pub fn batch_count(&self, documents: usize) -> usize {
        documents.div_ceil(self.options.batch_capacity)
    }

    /// Process every batch in order, writing outputs to `output_dir`.
    ///
    /// Stops at the first failing batch; outputs of earlier batches stay on
    /// disk.
    pub async fn run(
        &self,
        inputs: &[PathBuf],
        output_dir: impl AsRef<Path>,
    ) -> Result<RunReport> {
        let output_dir = output_dir.as_ref();
        tokio::fs::create_dir_all(output_dir).await?;
        debug!(
            "{} documents in {} batches of up to {}",
            inputs.len(),
            self.batch_count(inputs.len()),
            self.options.batch_capacity
        );

        let mut report = RunReport::default();
        for (index, batch) in inputs.chunks(self.options.batch_capacity).enumerate() {
            let batch_report = self.run_batch(index + 1, batch, output_dir).await?;
            report.batches.push(batch_report);
        }

        info!(
            "Processed {} documents in {} batches",
            report.total_documents(),
            report.batches.len()
        );
        Ok(report)
    }

    async fn run_batch(
        &self,
        ordinal: usize,
        paths: &[PathBuf],
        output_dir: &Path,
    ) -> Result<BatchReport> {
        info!("Processing batch {} with {} PDFs", ordinal, paths.len());

        let paths = paths.to_vec();
        let options = self.options.clone();
        let imposed =
            tokio::task::spawn_blocking(move || impose_batch(ordinal, &paths, &options)).await??;

        let front_output = self
            .write_output(
                ordinal,
                imposed.front.as_deref(),
                output_dir.join(self.options.front_file_name(ordinal)),
            )
            .await?;
        let back_output = self
            .write_output(
                ordinal,
                imposed.back.as_deref(),
                output_dir.join(self.options.back_file_name(ordinal)),
            )
            .await?;

        Ok(BatchReport {
            ordinal,
            documents: imposed.documents,
            front_output,
            back_output,
            front_sheets: imposed.front_sheets,
            back_sheets: imposed.back_sheets,
            blank_substitutions: imposed.blank_substitutions,
        })
    }

    async fn write_output(
        &self,
        batch: usize,
        bytes: Option<&[u8]>,
        path: PathBuf,
    ) -> Result<Option<PathBuf>> {
        let Some(bytes) = bytes else {
            debug!("batch {}: nothing to write for {}", batch, path.display());
            return Ok(None);
        };

        match write_atomic(&path, bytes).await {
            Ok(()) => {
                info!("Wrote {}", path.display());
                Ok(Some(path))
            }
            Err(source) => Err(DuplexError::Write {
                batch,
                path,
                source,
            }),
        }
    }
}
