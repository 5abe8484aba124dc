//! XObject creation for sheet composition
//!
//! Source pages are wrapped as Form XObjects in the output document and
//! then drawn onto sheets with a scale/translate matrix.

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MAX_PAGE_TREE_DEPTH};
use crate::pool::SourceDocument;
use crate::types::{DuplexError, PageBox, PageRef, PageRotation, Rect, Result, SourceId};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

// =============================================================================
// Cache
// =============================================================================

/// Tracks what has already been copied into one output document.
///
/// Object ids are only unique within a single source document, so copied
/// objects are keyed per source.
#[derive(Debug, Default)]
pub struct XObjectCache {
    objects: HashMap<SourceId, HashMap<ObjectId, ObjectId>>,
    forms: HashMap<PageRef, ObjectId>,
}

impl XObjectCache {
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// XObject Creation
// =============================================================================

/// Create (or reuse) a Form XObject for one page of a source document.
///
/// The form's BBox is the page's visible box, which clips anything outside
/// the CropBox. Callers translate by the box origin when placing it.
pub fn create_page_xobject(
    output: &mut Document,
    source: &SourceDocument,
    page: PageRef,
    cache: &mut XObjectCache,
) -> Result<ObjectId> {
    if let Some(&id) = cache.forms.get(&page) {
        return Ok(id);
    }

    let doc = source.document();
    let page_id = source
        .page_id(page.page_index)
        .ok_or(DuplexError::PageOutOfRange(page))?;
    let page_dict = doc.get_dictionary(page_id)?;
    let bbox = source
        .page_box(page.page_index)
        .map(|page_box| page_box.rect)
        .unwrap_or_else(default_page_box);

    let content_data = get_page_content(doc, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(bbox.x),
            Object::Real(bbox.y),
            Object::Real(bbox.right()),
            Object::Real(bbox.top()),
        ]),
    );
    xobject_dict.set("FormType", Object::Integer(1));

    // Resources may live on the page or on any ancestor in the page tree
    if let Some(resources) = inherited_attribute(doc, page_id, b"Resources") {
        let object_cache = cache.objects.entry(page.source).or_default();
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, doc, resources, object_cache)?,
        );
    }

    let id = output.add_object(Stream::new(xobject_dict, content_data));
    cache.forms.insert(page, id);
    Ok(id)
}

fn default_page_box() -> Rect {
    Rect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the decoded content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(arr) => get_concatenated_content_streams(doc, arr),
            Object::Stream(stream) => Ok(stream_bytes(stream)),
            _ => Ok(Vec::new()),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                result.extend_from_slice(&stream_bytes(stream));
                result.push(b'\n');
            }
        }
    }

    Ok(result)
}

fn stream_bytes(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// `Parent` links are not followed so a resource dictionary never drags the
/// source page tree along.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            // Reserve the id first so reference cycles terminate
            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let copied = match source.get_object(*id) {
                Ok(referenced) => copy_object_deep(output, source, referenced, cache)?,
                Err(_) => Object::Null,
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => {
            let dict = copy_dictionary(output, source, &stream.dict, cache)?;
            let mut copy = Stream::new(dict, stream.content.clone());
            copy.allows_compression = stream.allows_compression;
            Ok(Object::Stream(copy))
        }
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

// =============================================================================
// Page Tree Lookups
// =============================================================================

/// Look up a page attribute, following `Parent` links for inheritable keys.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = Some(page_id);
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let dict = doc.get_dictionary(current?).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Parse a box array (`[x0 y0 x1 y1]`), resolving an indirect array
fn parse_box(doc: &Document, obj: &Object) -> Option<Rect> {
    let (_, obj) = doc.dereference(obj).ok()?;
    let values = obj.as_array().ok()?;
    if values.len() < 4 {
        return None;
    }

    let x0 = extract_number(&values[0])?;
    let y0 = extract_number(&values[1])?;
    let x1 = extract_number(&values[2])?;
    let y1 = extract_number(&values[3])?;
    Some(Rect::from_corners(x0, y0, x1, y1))
}

/// Visible box of a page in points.
///
/// The CropBox is clipped to the MediaBox; a missing, malformed or
/// non-overlapping CropBox falls back to the MediaBox. Both boxes and
/// `/Rotate` are inherited through the page tree.
pub fn get_page_box(doc: &Document, page_id: ObjectId) -> Option<PageBox> {
    let media_box = parse_box(doc, inherited_attribute(doc, page_id, b"MediaBox")?)?;
    let visible = inherited_attribute(doc, page_id, b"CropBox")
        .and_then(|crop_box| parse_box(doc, crop_box))
        .and_then(|crop_box| crop_box.intersection(&media_box))
        .unwrap_or(media_box);

    let rotation = inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|rotate| doc.dereference(rotate).ok())
        .and_then(|(_, rotate)| extract_number(rotate))
        .map(|degrees| PageRotation::from_degrees(degrees.round() as i64))
        .unwrap_or_default();

    Some(PageBox::new(visible, rotation))
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
