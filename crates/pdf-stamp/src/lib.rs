//! First-page label stamping
//!
//! Each document gets a short label (its file name up to the first
//! underscore) drawn on page 1, either at fixed coordinates or just below a
//! marker phrase found in the page text. Labels are set in Helvetica, or
//! in an embedded TrueType font when one is supplied.

pub mod coordinates;
pub mod font;
pub mod label;
pub mod placement;
pub mod scan;
pub mod stamp;
mod types;

pub use coordinates::{Coordinates, load_coordinates, parse_coordinates};
pub use label::label_for;
pub use placement::{find_marker, resolve_placement};
pub use scan::scan_text_lines;
pub use font::EmbeddedFont;
pub use stamp::{output_path_for, stamp_file, stamp_first_page, stamp_first_page_with_font};
pub use types::*;
