use crate::font::{parse_face, text_width_em};
use crate::layout::{entry_position, fit_layout, fit_layout_with};
use crate::options::CatalogOptions;
use crate::types::{CatalogError, CatalogLayout, Result};
use log::info;
use printpdf::*;
use std::path::Path;

/// Render `names` as a catalog and write it to `output_path`
pub async fn generate_pdf(
    names: &[String],
    options: &CatalogOptions,
    output_path: impl AsRef<Path>,
) -> Result<CatalogLayout> {
    let names = names.to_vec();
    let options = options.clone();
    let output_path = output_path.as_ref().to_owned();

    let font_bytes = match &options.font_file {
        Some(path) => Some(tokio::fs::read(path).await?),
        None => None,
    };

    let (bytes, layout) = tokio::task::spawn_blocking(move || match font_bytes {
        Some(font_bytes) => generate_catalog_pdf_bytes_with_font(&names, &options, &font_bytes),
        None => generate_catalog_pdf_bytes(&names, &options),
    })
    .await??;

    tokio::fs::write(&output_path, bytes).await?;
    info!(
        "Catalog written to {} ({} pages, {}pt, {} columns)",
        output_path.display(),
        layout.pages,
        layout.font_size_pt,
        layout.columns
    );

    Ok(layout)
}

/// Render the catalog in memory with Helvetica. An empty list gives one
/// empty page.
pub fn generate_catalog_pdf_bytes(
    names: &[String],
    options: &CatalogOptions,
) -> Result<(Vec<u8>, CatalogLayout)> {
    let layout = fit_layout(names, options)?;
    let mut doc = PdfDocument::new(&options.title);

    let pages = draw_names(names, &layout, options, |name, size| {
        vec![
            Op::SetFontSizeBuiltinFont {
                font: BuiltinFont::Helvetica,
                size,
            },
            Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(name.to_string())],
                font: BuiltinFont::Helvetica,
            },
        ]
    });

    Ok((save(&mut doc, pages), layout))
}

/// Render the catalog in memory, embedding the TrueType font in
/// `font_bytes` and measuring names with its glyph advances
pub fn generate_catalog_pdf_bytes_with_font(
    names: &[String],
    options: &CatalogOptions,
    font_bytes: &[u8],
) -> Result<(Vec<u8>, CatalogLayout)> {
    let face = parse_face(font_bytes)?;
    let layout = fit_layout_with(names, options, |name| text_width_em(&face, name))?;

    let mut doc = PdfDocument::new(&options.title);
    let mut font_warnings = Vec::new();
    let font = ParsedFont::from_bytes(font_bytes, 0, &mut font_warnings)
        .ok_or_else(|| CatalogError::Font("Failed to parse font".to_string()))?;
    let font_id = doc.add_font(&font);

    let pages = draw_names(names, &layout, options, |name, size| {
        vec![
            Op::SetFontSize {
                font: font_id.clone(),
                size,
            },
            Op::WriteText {
                items: vec![TextItem::Text(name.to_string())],
                font: font_id.clone(),
            },
        ]
    });

    Ok((save(&mut doc, pages), layout))
}

/// One page per layout page, each name in its own text section
fn draw_names<F>(
    names: &[String],
    layout: &CatalogLayout,
    options: &CatalogOptions,
    mut text_ops: F,
) -> Vec<PdfPage>
where
    F: FnMut(&str, Pt) -> Vec<Op>,
{
    let mut page_ops: Vec<Vec<Op>> = (0..layout.pages).map(|_| Vec::new()).collect();

    for (index, name) in names.iter().enumerate() {
        let (page, x, y) = entry_position(index, layout, options);

        let ops = &mut page_ops[page];
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        });
        ops.extend(text_ops(name, Pt(layout.font_size_pt)));
        ops.push(Op::EndTextSection);
    }

    page_ops
        .into_iter()
        .map(|ops| PdfPage::new(Mm(options.page_width_mm), Mm(options.page_height_mm), ops))
        .collect()
}

fn save(doc: &mut PdfDocument, pages: Vec<PdfPage>) -> Vec<u8> {
    doc.pages = pages;
    let mut warnings = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}
