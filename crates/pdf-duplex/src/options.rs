use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry of a landscape output sheet split into a left and a right half
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    /// Fraction of `width_pt` available to each placed page (at most 0.5)
    pub half_width_fraction: f32,
    /// Fraction of `height_pt` available to each placed page
    pub half_height_fraction: f32,
    /// Allow pages smaller than their half to be scaled up
    pub allow_upscale: bool,
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self::a4_landscape()
    }
}

impl SheetGeometry {
    /// A4 landscape with room between the halves, used for page pairs
    pub fn a4_landscape() -> Self {
        Self {
            width_pt: A4_LONG_EDGE_PT,
            height_pt: A4_SHORT_EDGE_PT,
            half_width_fraction: PAIR_HALF_WIDTH_FRACTION,
            half_height_fraction: HALF_HEIGHT_FRACTION,
            allow_upscale: true,
        }
    }

    /// A4 landscape with a narrower gutter, used for album-style two-up
    pub fn album() -> Self {
        Self {
            half_width_fraction: ALBUM_HALF_WIDTH_FRACTION,
            ..Self::a4_landscape()
        }
    }

    pub fn half_width(&self) -> f32 {
        self.width_pt * self.half_width_fraction
    }

    pub fn half_height(&self) -> f32 {
        self.height_pt * self.half_height_fraction
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width_pt > 0.0 && self.height_pt > 0.0) {
            return Err(DuplexError::Config(format!(
                "Sheet dimensions must be positive, got {} x {}",
                self.width_pt, self.height_pt
            )));
        }
        // Above one half a placed page could reach into the opposite half
        if !(self.half_width_fraction > 0.0 && self.half_width_fraction <= 0.5) {
            return Err(DuplexError::Config(format!(
                "Half width fraction must be in (0, 0.5], got {}",
                self.half_width_fraction
            )));
        }
        if !(self.half_height_fraction > 0.0 && self.half_height_fraction <= 1.0) {
            return Err(DuplexError::Config(format!(
                "Half height fraction must be in (0, 1], got {}",
                self.half_height_fraction
            )));
        }
        Ok(())
    }
}

/// Configuration for a batch run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DuplexOptions {
    /// Maximum documents per batch
    pub batch_capacity: usize,

    /// Output sheet layout
    pub sheet: SheetGeometry,

    /// Size of the synthetic page used to pad short documents
    pub blank_page: PageSize,

    // Output naming
    pub front_prefix: String,
    pub back_prefix: String,
    pub extension: String,
}

impl Default for DuplexOptions {
    fn default() -> Self {
        Self {
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            sheet: SheetGeometry::a4_landscape(),
            blank_page: PageSize::new(A4_SHORT_EDGE_PT, A4_LONG_EDGE_PT),
            front_prefix: FRONT_PREFIX.to_string(),
            back_prefix: BACK_PREFIX.to_string(),
            extension: PDF_EXTENSION.to_string(),
        }
    }
}

impl DuplexOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| DuplexError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DuplexError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.batch_capacity == 0 {
            return Err(DuplexError::Config(
                "Batch capacity must be at least 1".to_string(),
            ));
        }

        self.sheet.validate()?;

        if !(self.blank_page.width_pt > 0.0 && self.blank_page.height_pt > 0.0) {
            return Err(DuplexError::Config(
                "Blank page dimensions must be positive".to_string(),
            ));
        }

        if self.front_prefix == self.back_prefix {
            return Err(DuplexError::Config(
                "Front and back prefixes must differ".to_string(),
            ));
        }

        if self.extension.is_empty() || self.extension.contains(['/', '\\', '.']) {
            return Err(DuplexError::Config(format!(
                "Invalid output extension: {:?}",
                self.extension
            )));
        }

        Ok(())
    }

    /// File name of the front-pair document for a 1-based batch ordinal
    pub fn front_file_name(&self, ordinal: usize) -> String {
        format!("{}{}.{}", self.front_prefix, ordinal, self.extension)
    }

    /// File name of the back-pair document for a 1-based batch ordinal
    pub fn back_file_name(&self, ordinal: usize) -> String {
        format!("{}{}.{}", self.back_prefix, ordinal, self.extension)
    }
}
