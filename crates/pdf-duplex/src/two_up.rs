//! Album-style two-up: every page of one document, two per landscape sheet

use crate::compose::compose_sheets;
use crate::io::{load_pdf, save_pdf};
use crate::options::SheetGeometry;
use crate::pool::{DocumentPool, SourceDocument};
use crate::types::*;
use lopdf::Document;
use log::info;
use std::path::Path;

/// Arrange all pages of `source` two per sheet, in page order
pub fn two_up_document(source: SourceDocument, geometry: &SheetGeometry) -> Result<Document> {
    geometry.validate()?;

    let pages: Vec<PageRef> = (0..source.page_count())
        .map(|index| PageRef::page(0, index))
        .collect();
    let blank_size = PageSize::new(geometry.height_pt, geometry.width_pt);
    let pool = DocumentPool::from_documents(1, vec![source], blank_size);

    compose_sheets(&pool, &pages, geometry)
}

/// Load `input`, arrange it two-up and save the result to `output`
pub async fn two_up(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    geometry: &SheetGeometry,
) -> Result<usize> {
    let input = input.as_ref().to_owned();
    let document = load_pdf(&input).await?;
    let geometry = *geometry;

    let source_pages = document.get_pages().len();
    let composed = tokio::task::spawn_blocking(move || {
        two_up_document(SourceDocument::from_document(input, document), &geometry)
    })
    .await??;

    let sheets = composed.get_pages().len();
    save_pdf(composed, output.as_ref()).await?;
    info!(
        "Arranged {} pages on {} sheets -> {}",
        source_pages,
        sheets,
        output.as_ref().display()
    );
    Ok(sheets)
}
