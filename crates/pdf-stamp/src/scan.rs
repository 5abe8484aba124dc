//! Text line extraction from a page content stream
//!
//! Only positions are tracked; glyph advances are not, so every text
//! showing operator is anchored at the current text matrix origin.

use crate::types::{Result, TextLine};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

/// Spans closer than this vertically belong to the same line
const LINE_TOLERANCE_PT: f32 = 2.0;

/// TJ adjustments beyond this (thousandths of an em) read as a word gap
const TJ_SPACE_THRESHOLD: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        Some(Self {
            a: get_number(&operands[0])?,
            b: get_number(&operands[1])?,
            c: get_number(&operands[2])?,
            d: get_number(&operands[3])?,
            e: get_number(&operands[4])?,
            f: get_number(&operands[5])?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self` applied first, then `other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }
}

struct TextState {
    ctm: Matrix,
    stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn origin(&self) -> (f32, f32) {
        let m = self.text_matrix.then(&self.ctm);
        (m.e, m.f)
    }
}

struct Span {
    x: f32,
    y: f32,
    text: String,
}

/// Text lines on a page, top to bottom, in default user space
pub fn scan_text_lines(doc: &Document, page_id: ObjectId) -> Result<Vec<TextLine>> {
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut state = TextState::new();
    let mut spans = Vec::new();

    for op in &content.operations {
        let operands = &op.operands;
        let shown = match op.operator.as_str() {
            "q" => {
                state.stack.push(state.ctm);
                None
            }
            "Q" => {
                state.ctm = state.stack.pop().unwrap_or(Matrix::IDENTITY);
                None
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.ctm = m.then(&state.ctm);
                }
                None
            }
            "BT" => {
                state.text_matrix = Matrix::IDENTITY;
                state.line_matrix = Matrix::IDENTITY;
                None
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
                None
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (number_at(operands, 0), number_at(operands, 1)) {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
                None
            }
            "TL" => {
                if let Some(leading) = number_at(operands, 0) {
                    state.leading = leading;
                }
                None
            }
            "T*" => {
                state.next_line();
                None
            }
            "Tj" => operands.first().and_then(decode_string),
            "TJ" => operands.first().and_then(decode_array),
            "'" => {
                state.next_line();
                operands.first().and_then(decode_string)
            }
            "\"" => {
                state.next_line();
                operands.get(2).and_then(decode_string)
            }
            _ => None,
        };

        if let Some(text) = shown.filter(|t| !t.trim().is_empty()) {
            let (x, y) = state.origin();
            spans.push(Span { x, y, text });
        }
    }

    Ok(group_lines(spans))
}

fn group_lines(mut spans: Vec<Span>) -> Vec<TextLine> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut groups: Vec<Vec<Span>> = Vec::new();
    for span in spans {
        match groups.last_mut() {
            Some(group) if (group[0].y - span.y).abs() <= LINE_TOLERANCE_PT => group.push(span),
            _ => groups.push(vec![span]),
        }
    }

    groups
        .into_iter()
        .map(|mut group| {
            group.sort_by(|a, b| a.x.total_cmp(&b.x));
            let mut line = TextLine {
                x: group[0].x,
                y: group[0].y,
                text: String::new(),
            };
            for span in group {
                if !line.text.is_empty() && !line.text.ends_with(' ') && !span.text.starts_with(' ')
                {
                    line.text.push(' ');
                }
                line.text.push_str(&span.text);
            }
            line
        })
        .collect()
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn number_at(operands: &[Object], index: usize) -> Option<f32> {
    operands.get(index).and_then(get_number)
}

fn decode_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_bytes(bytes)),
        _ => None,
    }
}

fn decode_array(obj: &Object) -> Option<String> {
    let items = obj.as_array().ok()?;
    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => text.push_str(&decode_bytes(bytes)),
            other => {
                if let Some(adjustment) = get_number(other) {
                    if -adjustment > TJ_SPACE_THRESHOLD && !text.is_empty() && !text.ends_with(' ')
                    {
                        text.push(' ');
                    }
                }
            }
        }
    }
    Some(text)
}

/// UTF-16BE when the string carries a byte order mark, Latin-1 otherwise
fn decode_bytes(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}
