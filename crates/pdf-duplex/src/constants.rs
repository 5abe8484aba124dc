//! Shared constants for duplex imposition
//!
//! Default geometry and naming used when no configuration file is given.

// =============================================================================
// Sheet Geometry
// =============================================================================

/// ISO A4 long edge in points
pub const A4_LONG_EDGE_PT: f32 = 841.89;

/// ISO A4 short edge in points
pub const A4_SHORT_EDGE_PT: f32 = 595.28;

/// Share of the sheet width given to each half when composing page pairs
pub const PAIR_HALF_WIDTH_FRACTION: f32 = 0.45;

/// Share of the sheet width given to each half in album (two-up) layout
pub const ALBUM_HALF_WIDTH_FRACTION: f32 = 0.48;

/// Share of the sheet height available to each half
pub const HALF_HEIGHT_FRACTION: f32 = 0.95;

/// Fallback page size when a page has no usable MediaBox (US Letter)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (612.0, 792.0);

// =============================================================================
// Batching
// =============================================================================

/// Documents per batch
pub const DEFAULT_BATCH_CAPACITY: usize = 5;

/// Pages taken from each document for one side (front pair / back pair)
pub const PAGES_PER_SIDE: usize = 2;

// =============================================================================
// Output Naming
// =============================================================================

pub const FRONT_PREFIX: &str = "first_pages_group_";
pub const BACK_PREFIX: &str = "last_pages_group_";
pub const PDF_EXTENSION: &str = "pdf";

/// Guard against cyclic page trees when walking `Parent` links
pub(crate) const MAX_PAGE_TREE_DEPTH: usize = 32;
