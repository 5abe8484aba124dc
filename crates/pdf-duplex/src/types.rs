use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuplexError {
    /// A source file could not be parsed; the batch is aborted.
    #[error("batch {batch}: cannot open {}: {source}", .path.display())]
    DocumentOpen {
        batch: usize,
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    /// An output document could not be saved under its final name.
    #[error("batch {batch}: cannot write {}: {source}", .path.display())]
    Write {
        batch: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Page reference out of range: {0:?}")]
    PageOutOfRange(PageRef),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, DuplexError>;

/// Axis-aligned rectangle in PDF user space (origin bottom-left, points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from two opposite corners in any order
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Overlap of two rectangles, `None` when they do not overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.top().min(other.top());
        (x0 < x1 && y0 < y1).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Clockwise display rotation of a page (its `/Rotate` entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageRotation {
    #[default]
    None,
    Clockwise90,
    Rotated180,
    Clockwise270,
}

impl PageRotation {
    /// From a `/Rotate` value. Negative values count counter-clockwise;
    /// anything that is not a multiple of 90 is ignored.
    pub fn from_degrees(degrees: i64) -> Self {
        match degrees.rem_euclid(360) {
            90 => Self::Clockwise90,
            180 => Self::Rotated180,
            270 => Self::Clockwise270,
            _ => Self::None,
        }
    }

    /// Whether width and height trade places on display
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Clockwise90 | Self::Clockwise270)
    }
}

/// Visible area of a source page: its CropBox (clipped to the MediaBox) in
/// the page's own user space, and how that area is turned on display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub rect: Rect,
    pub rotation: PageRotation,
}

impl PageBox {
    pub fn new(rect: Rect, rotation: PageRotation) -> Self {
        Self { rect, rotation }
    }

    /// Width and height as the page is displayed
    pub fn display_size(&self) -> (f32, f32) {
        if self.rotation.swaps_axes() {
            (self.rect.height, self.rect.width)
        } else {
            (self.rect.width, self.rect.height)
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.rect.is_degenerate()
    }
}

impl From<Rect> for PageBox {
    fn from(rect: Rect) -> Self {
        Self::new(rect, PageRotation::None)
    }
}

/// Which document of a batch a page comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    /// Index into the batch's documents, in input order
    Document(usize),
    /// The batch's shared blank page
    Blank,
}

/// A page to draw: a source handle plus a page index.
///
/// A blank reference always points at page 0 of the batch's blank page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRef {
    pub source: SourceId,
    pub page_index: usize,
}

impl PageRef {
    pub const BLANK: PageRef = PageRef {
        source: SourceId::Blank,
        page_index: 0,
    };

    pub fn page(document: usize, page_index: usize) -> Self {
        Self {
            source: SourceId::Document(document),
            page_index,
        }
    }

    pub fn blank() -> Self {
        Self::BLANK
    }

    pub fn is_blank(&self) -> bool {
        self.source == SourceId::Blank
    }
}

/// Width and height of a page in points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }
}

/// Counts for one processed batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// 1-based batch ordinal
    pub ordinal: usize,
    pub documents: usize,
    pub front_output: Option<PathBuf>,
    pub back_output: Option<PathBuf>,
    pub front_sheets: usize,
    pub back_sheets: usize,
    /// Page positions filled with the blank page
    pub blank_substitutions: usize,
}

/// Result of a full run over all batches
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunReport {
    pub batches: Vec<BatchReport>,
}

impl RunReport {
    /// Every file written, in batch order (front before back)
    pub fn written_files(&self) -> Vec<PathBuf> {
        self.batches
            .iter()
            .flat_map(|b| b.front_output.iter().chain(b.back_output.iter()))
            .cloned()
            .collect()
    }

    pub fn total_documents(&self) -> usize {
        self.batches.iter().map(|b| b.documents).sum()
    }
}

/// Statistics about a planned run
#[derive(Debug, Clone, PartialEq)]
pub struct DuplexStatistics {
    pub documents: usize,
    pub batches: usize,
    pub front_sheets: usize,
    pub back_sheets: usize,
    /// Source pages that will actually be drawn
    pub real_pages: usize,
    pub blank_substitutions: usize,
}
