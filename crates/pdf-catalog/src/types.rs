use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid catalog options: {0}")]
    Config(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result of the font size and column search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogLayout {
    pub font_size_pt: f32,
    pub columns: usize,
    pub rows_per_column: usize,
    pub pages: usize,
    /// False when even the smallest font needed pagination
    pub fits_one_page: bool,
}

impl CatalogLayout {
    pub fn entries_per_page(&self) -> usize {
        self.columns * self.rows_per_column
    }
}
