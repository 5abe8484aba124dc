use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Document has no pages")]
    NoPages,
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StampError>;

/// Where the label goes on the first page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    At { x: f32, y: f32 },
    Skip,
}

/// How a [`Placement`] is chosen for each document
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementStrategy {
    /// Same coordinates for every document
    Fixed { x: f32, y: f32 },
    /// Below the first text line containing one of `markers`, at column `x`.
    /// Documents without a marker are skipped.
    Marker {
        x: f32,
        markers: Vec<String>,
        gap_pt: f32,
    },
}

/// One line of text on a page, in default user space
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StampOptions {
    pub font_size_pt: f32,
    /// Appended to the input file stem to name the output
    pub output_suffix: String,
    /// TrueType font to embed for the label. Without one the label is set
    /// in Helvetica and limited to Latin-1.
    pub font_file: Option<PathBuf>,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            font_size_pt: 12.0,
            output_suffix: "-sgn".to_string(),
            font_file: None,
        }
    }
}

/// What happened to one input document
#[derive(Debug, Clone, PartialEq)]
pub enum StampOutcome {
    Stamped(PathBuf),
    Skipped,
}
