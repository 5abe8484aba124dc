//! Output page rendering
//!
//! Turns a [`SheetLayout`] into a page of the output document and wraps a
//! list of rendered pages into a complete document.

use crate::compose::{Placement, SheetLayout};
use crate::options::SheetGeometry;
use crate::pool::DocumentPool;
use crate::types::{DuplexError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::{XObjectCache, create_page_xobject};

/// Render one sheet to the output document.
///
/// Halves without a placement stay empty; nothing is painted over them.
pub fn render_sheet(
    output: &mut Document,
    pool: &DocumentPool,
    layout: &SheetLayout,
    geometry: &SheetGeometry,
    parent_pages_id: ObjectId,
    cache: &mut XObjectCache,
) -> Result<ObjectId> {
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(geometry.width_pt),
            Object::Real(geometry.height_pt),
        ]),
    );

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();

    for (idx, placement) in layout.placements().enumerate() {
        let source = pool
            .resolve(placement.page.source)
            .ok_or(DuplexError::PageOutOfRange(placement.page))?;

        let xobject_name = format!("P{}", idx);
        let xobject_id = create_page_xobject(output, source, placement.page, cache)?;
        xobjects.set(xobject_name.as_bytes(), Object::Reference(xobject_id));

        content_ops.push(generate_placement_command(&xobject_name, placement));
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

/// Content stream command drawing a form at its placement.
///
/// The matrix shifts the form's BBox origin onto the placement corner and
/// turns rotated pages upright.
fn generate_placement_command(xobject_name: &str, placement: &Placement) -> String {
    let [a, b, c, d, e, f] = placement.matrix();
    format!(
        "q {} {} {} {} {} {} cm /{} Do Q\n",
        a, b, c, d, e, f, xobject_name
    )
}

/// Install the pages tree and catalog, completing the output document
pub fn finish_document(
    output: &mut Document,
    pages_tree_id: ObjectId,
    page_ids: Vec<ObjectId>,
) {
    let count = page_ids.len() as i64;
    let kids = page_ids.into_iter().map(Object::Reference).collect();
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);
}
