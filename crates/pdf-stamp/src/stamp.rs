//! Overlaying a text label on a document's first page

use crate::font::EmbeddedFont;
use crate::label::label_for;
use crate::placement::{first_page_id, resolve_placement};
use crate::types::*;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use log::{info, warn};
use std::path::{Path, PathBuf};

const FONT_RESOURCE_PREFIX: &str = "FStamp";
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// Use Helvetica (standard PDF font, nothing to embed)
fn use_helvetica_font(doc: &mut Document) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    doc.add_object(Object::Dictionary(font))
}

/// Encode `text` for a WinAnsi font. Characters outside Latin-1 become `?`.
fn encode_label(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn resolve_dict(doc: &Document, obj: &Object) -> Result<Dictionary> {
    match obj {
        Object::Reference(id) => Ok(doc.get_dictionary(*id)?.clone()),
        Object::Dictionary(dict) => Ok(dict.clone()),
        _ => Ok(Dictionary::new()),
    }
}

/// The page's effective Resources, following Parent links when the page
/// inherits them
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut current = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(resources) = current.get(b"Resources") {
            return resolve_dict(doc, resources);
        }
        match current.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = doc.get_dictionary(parent)?,
            Err(_) => break,
        }
    }
    Ok(Dictionary::new())
}

/// Give the page its own Resources holding `font_id`, returning the
/// font's resource name
fn add_font_to_page_resources(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> Result<Vec<u8>> {
    let mut resources = page_resources(doc, page_id)?;
    let mut fonts = match resources.get(b"Font") {
        Ok(fonts) => resolve_dict(doc, fonts)?,
        Err(_) => Dictionary::new(),
    };

    let mut n = 1;
    let name = loop {
        let candidate = format!("{}{}", FONT_RESOURCE_PREFIX, n).into_bytes();
        if !fonts.has(&candidate) {
            break candidate;
        }
        n += 1;
    };

    fonts.set(name.clone(), Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));
    doc.get_dictionary_mut(page_id)?
        .set("Resources", Object::Dictionary(resources));
    Ok(name)
}

/// Wrap the existing page content in `q`/`Q` and append `new_content_id`
/// after it, so the label is drawn on top in an unmodified coordinate
/// system.
fn wrap_and_append_content(
    doc: &mut Document,
    page_id: ObjectId,
    new_content_id: ObjectId,
) -> Result<()> {
    let existing = match doc.get_dictionary(page_id)?.get(b"Contents").ok().cloned() {
        // Contents may reference an array of streams
        Some(Object::Reference(id)) => match doc.get_object(id)? {
            Object::Array(streams) => streams.clone(),
            _ => vec![Object::Reference(id)],
        },
        Some(Object::Array(streams)) => streams,
        _ => Vec::new(),
    };

    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let mut contents = vec![Object::Reference(save_id)];
    contents.extend(existing);
    contents.push(Object::Reference(new_content_id));

    doc.get_dictionary_mut(page_id)?
        .set("Contents", Object::Array(contents));
    Ok(())
}

/// Draw `label` in Helvetica on the first page of `doc`.
///
/// Returns `false` without touching the document when `placement` is
/// [`Placement::Skip`].
pub fn stamp_first_page(
    doc: &mut Document,
    label: &str,
    placement: Placement,
    font_size_pt: f32,
) -> Result<bool> {
    stamp_first_page_with_font(doc, label, placement, font_size_pt, None)
}

/// Draw `label` on the first page of `doc`, embedding `font` when given
/// and falling back to Helvetica otherwise
pub fn stamp_first_page_with_font(
    doc: &mut Document,
    label: &str,
    placement: Placement,
    font_size_pt: f32,
    font: Option<&EmbeddedFont<'_>>,
) -> Result<bool> {
    let Placement::At { x, y } = placement else {
        return Ok(false);
    };
    let page_id = first_page_id(doc)?;

    let (font_id, text) = match font {
        Some(font) => (
            font.embed(doc, label),
            Object::String(font.encode(label), StringFormat::Hexadecimal),
        ),
        None => (
            use_helvetica_font(doc),
            Object::String(encode_label(label), StringFormat::Literal),
        ),
    };
    let font_name = add_font_to_page_resources(doc, page_id, font_id)?;

    let content = Content {
        operations: vec![
            Operation::new("Q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font_name), Object::Real(font_size_pt)],
            ),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new("Tj", vec![text]),
            Operation::new("ET", vec![]),
        ],
    };
    // Leading newline keeps the operators apart when streams are concatenated
    let mut bytes = b"\n".to_vec();
    bytes.extend(content.encode()?);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), bytes));
    wrap_and_append_content(doc, page_id, content_id)?;

    Ok(true)
}

/// Output path for a stamped copy of `input`: `<stem><suffix>.pdf`
pub fn output_path_for(input: &Path, output_dir: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}{}.pdf", stem, suffix))
}

/// Stamp one document's label on its first page and write the copy into
/// `output_dir`. Nothing is written for a skipped document.
pub async fn stamp_file(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    strategy: &PlacementStrategy,
    options: &StampOptions,
) -> Result<StampOutcome> {
    let input = input.as_ref().to_owned();
    let output = output_path_for(&input, output_dir.as_ref(), &options.output_suffix);
    let label = label_for(&input);

    let bytes = tokio::fs::read(&input).await?;
    let font_bytes = match &options.font_file {
        Some(path) => Some(tokio::fs::read(path).await?),
        None => None,
    };
    let strategy = strategy.clone();
    let font_size_pt = options.font_size_pt;
    let task_label = label.clone();

    let stamped = tokio::task::spawn_blocking(move || -> Result<Option<Vec<u8>>> {
        let font = font_bytes.as_deref().map(EmbeddedFont::parse).transpose()?;
        let mut doc = Document::load_mem(&bytes)?;
        let placement = resolve_placement(&doc, &strategy)?;
        if !stamp_first_page_with_font(
            &mut doc,
            &task_label,
            placement,
            font_size_pt,
            font.as_ref(),
        )? {
            return Ok(None);
        }
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(Some(buffer))
    })
    .await??;

    match stamped {
        Some(buffer) => {
            tokio::fs::write(&output, buffer).await?;
            info!("Stamped {:?} on {}", label, output.display());
            Ok(StampOutcome::Stamped(output))
        }
        None => {
            warn!("No placement found for {}, skipping", input.display());
            Ok(StampOutcome::Skipped)
        }
    }
}
