//! TrueType embedding for labels outside Latin-1
//!
//! The font is written as a Type0 composite font over a CIDFontType2 with
//! Identity-H encoding, so label strings are sequences of 2-byte glyph ids.
//! Widths and the ToUnicode map only cover the glyphs the label uses.

use crate::types::{Result, StampError};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeMap;
use std::fmt::Write;
use ttf_parser::{Face, GlyphId};

const FALLBACK_FONT_NAME: &str = "EmbeddedFont";

/// ToUnicode `bfchar` blocks hold at most 100 entries
const MAX_BFCHAR_ENTRIES: usize = 100;

pub struct EmbeddedFont<'a> {
    data: &'a [u8],
    face: Face<'a>,
    base_font: Vec<u8>,
}

impl<'a> EmbeddedFont<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let face = Face::parse(data, 0)
            .map_err(|e| StampError::Font(format!("cannot parse font: {}", e)))?;
        let base_font = postscript_name(&face).into_bytes();
        Ok(Self {
            data,
            face,
            base_font,
        })
    }

    /// Glyph id for a character, `.notdef` (0) when the font lacks it
    pub fn glyph_id(&self, c: char) -> u16 {
        self.face.glyph_index(c).map_or(0, |g| g.0)
    }

    /// `text` as big-endian 2-byte glyph ids
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|c| self.glyph_id(c).to_be_bytes())
            .collect()
    }

    /// Add the font objects for `text` to `doc`, returning the Type0 font
    pub fn embed(&self, doc: &mut Document, text: &str) -> ObjectId {
        let mut glyphs: BTreeMap<u16, char> = BTreeMap::new();
        for c in text.chars() {
            let glyph = self.glyph_id(c);
            if glyph != 0 {
                glyphs.entry(glyph).or_insert(c);
            }
        }

        let font_file_id = self.create_font_file(doc);
        let descriptor_id = self.create_font_descriptor(doc, font_file_id);
        let cid_font_id = self.create_cid_font(doc, descriptor_id, &glyphs);
        let to_unicode_id = create_to_unicode_cmap(doc, &glyphs);

        let dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type0".to_vec())),
            ("BaseFont", Object::Name(self.base_font.clone())),
            ("Encoding", Object::Name(b"Identity-H".to_vec())),
            (
                "DescendantFonts",
                Object::Array(vec![Object::Reference(cid_font_id)]),
            ),
            ("ToUnicode", Object::Reference(to_unicode_id)),
        ]);
        doc.add_object(dict)
    }

    /// Font units to the 1000-per-em glyph space
    fn scale(&self, units: i32) -> i64 {
        let units_per_em = i64::from(self.face.units_per_em().max(1));
        i64::from(units) * 1000 / units_per_em
    }

    fn glyph_width(&self, glyph: u16) -> i64 {
        let advance = self.face.glyph_hor_advance(GlyphId(glyph)).unwrap_or(0);
        self.scale(i32::from(advance))
    }

    fn create_font_file(&self, doc: &mut Document) -> ObjectId {
        let mut dict = Dictionary::new();
        dict.set("Length1", Object::Integer(self.data.len() as i64));
        let stream = Stream::new(dict, self.data.to_vec()).with_compression(true);
        doc.add_object(stream)
    }

    fn create_font_descriptor(&self, doc: &mut Document, font_file_id: ObjectId) -> ObjectId {
        let bbox = self.face.global_bounding_box();
        let ascent = self.face.ascender();
        let cap_height = self.face.capital_height().unwrap_or(ascent);

        let dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"FontDescriptor".to_vec())),
            ("FontName", Object::Name(self.base_font.clone())),
            ("Flags", Object::Integer(32)),
            (
                "FontBBox",
                Object::Array(vec![
                    Object::Integer(self.scale(i32::from(bbox.x_min))),
                    Object::Integer(self.scale(i32::from(bbox.y_min))),
                    Object::Integer(self.scale(i32::from(bbox.x_max))),
                    Object::Integer(self.scale(i32::from(bbox.y_max))),
                ]),
            ),
            ("ItalicAngle", Object::Integer(0)),
            ("Ascent", Object::Integer(self.scale(i32::from(ascent)))),
            (
                "Descent",
                Object::Integer(self.scale(i32::from(self.face.descender()))),
            ),
            ("CapHeight", Object::Integer(self.scale(i32::from(cap_height)))),
            ("StemV", Object::Integer(80)),
            ("FontFile2", Object::Reference(font_file_id)),
        ]);
        doc.add_object(dict)
    }

    fn create_cid_font(
        &self,
        doc: &mut Document,
        descriptor_id: ObjectId,
        glyphs: &BTreeMap<u16, char>,
    ) -> ObjectId {
        // [gid [w]] per used glyph
        let widths = glyphs
            .keys()
            .flat_map(|&glyph| {
                [
                    Object::Integer(i64::from(glyph)),
                    Object::Array(vec![Object::Integer(self.glyph_width(glyph))]),
                ]
            })
            .collect();

        let dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"CIDFontType2".to_vec())),
            ("BaseFont", Object::Name(self.base_font.clone())),
            (
                "CIDSystemInfo",
                Object::Dictionary(Dictionary::from_iter(vec![
                    (
                        "Registry",
                        Object::String(b"Adobe".to_vec(), StringFormat::Literal),
                    ),
                    (
                        "Ordering",
                        Object::String(b"Identity".to_vec(), StringFormat::Literal),
                    ),
                    ("Supplement", Object::Integer(0)),
                ])),
            ),
            ("FontDescriptor", Object::Reference(descriptor_id)),
            ("DW", Object::Integer(self.glyph_width(self.glyph_id(' ')))),
            ("W", Object::Array(widths)),
            ("CIDToGIDMap", Object::Name(b"Identity".to_vec())),
        ]);
        doc.add_object(dict)
    }
}

/// PostScript name from the font's name table, restricted to characters
/// valid in a PDF name
fn postscript_name(face: &Face<'_>) -> String {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
        .find_map(|name| name.to_string())
        .map(|name| {
            name.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_FONT_NAME.to_string())
}

fn create_to_unicode_cmap(doc: &mut Document, glyphs: &BTreeMap<u16, char>) -> ObjectId {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = glyphs.iter().collect();
    for block in entries.chunks(MAX_BFCHAR_ENTRIES) {
        let _ = writeln!(cmap, "{} beginbfchar", block.len());
        for (glyph, c) in block {
            let mut units = [0u16; 2];
            let utf16: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", glyph, utf16);
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    doc.add_object(Stream::new(Dictionary::new(), cmap.into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_data_is_rejected() {
        match EmbeddedFont::parse(b"definitely not a font") {
            Err(StampError::Font(_)) => {}
            Err(other) => panic!("Expected Font error, got {:?}", other),
            Ok(_) => panic!("Expected Font error, got a font"),
        }
    }
}
