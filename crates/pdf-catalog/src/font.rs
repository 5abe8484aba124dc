//! TrueType metrics for catalogs set in an embedded font

use crate::types::{CatalogError, Result};
use ttf_parser::Face;

pub fn parse_face(bytes: &[u8]) -> Result<Face<'_>> {
    Face::parse(bytes, 0).map_err(|e| CatalogError::Font(format!("cannot parse font: {}", e)))
}

/// Advance width of `text` in ems. Characters missing from the font count
/// as zero width.
pub fn text_width_em(face: &Face<'_>, text: &str) -> f32 {
    let units_per_em = f32::from(face.units_per_em().max(1));
    let units: f32 = text
        .chars()
        .filter_map(|c| face.glyph_index(c))
        .filter_map(|glyph| face.glyph_hor_advance(glyph))
        .map(f32::from)
        .sum();
    units / units_per_em
}
