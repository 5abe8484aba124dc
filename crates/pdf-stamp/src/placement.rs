use crate::scan::scan_text_lines;
use crate::types::*;
use lopdf::{Document, ObjectId};
use log::debug;

pub(crate) fn first_page_id(doc: &Document) -> Result<ObjectId> {
    doc.get_pages()
        .values()
        .next()
        .copied()
        .ok_or(StampError::NoPages)
}

/// Lowercased with all whitespace removed, so markers survive text that was
/// split across several show operators
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// First line containing one of `markers`, ignoring case and whitespace
pub fn find_marker<'a>(lines: &'a [TextLine], markers: &[String]) -> Option<&'a TextLine> {
    let markers: Vec<String> = markers
        .iter()
        .map(|m| normalize(m))
        .filter(|m| !m.is_empty())
        .collect();

    lines.iter().find(|line| {
        let text = normalize(&line.text);
        markers.iter().any(|m| text.contains(m.as_str()))
    })
}

/// Decide where the label goes on the first page of `doc`
pub fn resolve_placement(doc: &Document, strategy: &PlacementStrategy) -> Result<Placement> {
    match strategy {
        PlacementStrategy::Fixed { x, y } => Ok(Placement::At { x: *x, y: *y }),
        PlacementStrategy::Marker { x, markers, gap_pt } => {
            let lines = scan_text_lines(doc, first_page_id(doc)?)?;
            match find_marker(&lines, markers) {
                Some(line) => {
                    debug!("marker found in {:?} at y={}", line.text, line.y);
                    Ok(Placement::At {
                        x: *x,
                        y: line.y - gap_pt,
                    })
                }
                None => Ok(Placement::Skip),
            }
        }
    }
}
