use crate::types::{CatalogError, Result};
use printpdf::Mm;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaperType {
    Letter,
    Legal,
    A4,
    A5,
}

impl PaperType {
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PaperType::Letter => (215.9, 279.4),
            PaperType::Legal => (215.9, 355.6),
            PaperType::A4 => (210.0, 297.0),
            PaperType::A5 => (148.0, 210.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaperType::Letter => "Letter",
            PaperType::Legal => "Legal",
            PaperType::A4 => "A4",
            PaperType::A5 => "A5",
        }
    }
}

/// Average Helvetica glyph advance, in ems
pub const AVERAGE_ADVANCE_EM: f32 = 0.55;

#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub title: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_top_mm: f32,
    pub margin_bottom_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    pub column_spacing_mm: f32,
    pub max_columns: usize,
    pub max_font_size_pt: f32,
    pub min_font_size_pt: f32,
    pub font_step_pt: f32,
    /// Line height as a multiple of the font size
    pub line_spacing: f32,
    /// TrueType font to embed. Without one names are set in Helvetica,
    /// which only covers Latin-1.
    pub font_file: Option<PathBuf>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        let (width, height) = PaperType::A4.dimensions_mm();
        Self {
            title: "File list".to_string(),
            page_width_mm: width,
            page_height_mm: height,
            margin_top_mm: 15.0,
            margin_bottom_mm: 15.0,
            margin_left_mm: 15.0,
            margin_right_mm: 15.0,
            column_spacing_mm: 6.0,
            max_columns: 4,
            max_font_size_pt: 24.0,
            min_font_size_pt: 6.0,
            font_step_pt: 0.5,
            line_spacing: 1.25,
            font_file: None,
        }
    }
}

impl CatalogOptions {
    pub fn with_paper(mut self, paper: PaperType) -> Self {
        let (width, height) = paper.dimensions_mm();
        self.page_width_mm = width;
        self.page_height_mm = height;
        self
    }

    pub fn usable_width_pt(&self) -> f32 {
        Mm(self.page_width_mm - self.margin_left_mm - self.margin_right_mm)
            .into_pt()
            .0
    }

    pub fn usable_height_pt(&self) -> f32 {
        Mm(self.page_height_mm - self.margin_top_mm - self.margin_bottom_mm)
            .into_pt()
            .0
    }

    pub fn column_spacing_pt(&self) -> f32 {
        Mm(self.column_spacing_mm).into_pt().0
    }

    pub fn validate(&self) -> Result<()> {
        if self.usable_width_pt() <= 0.0 || self.usable_height_pt() <= 0.0 {
            return Err(CatalogError::Config(
                "Margins leave no room on the page".to_string(),
            ));
        }
        if self.max_columns == 0 {
            return Err(CatalogError::Config(
                "At least one column is required".to_string(),
            ));
        }
        if !(self.min_font_size_pt > 0.0 && self.min_font_size_pt <= self.max_font_size_pt) {
            return Err(CatalogError::Config(format!(
                "Font size range {}..{} is invalid",
                self.min_font_size_pt, self.max_font_size_pt
            )));
        }
        if self.font_step_pt <= 0.0 || self.line_spacing < 1.0 {
            return Err(CatalogError::Config(
                "Font step must be positive and line spacing at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
