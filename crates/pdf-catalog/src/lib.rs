//! Catalog page generation: lists document names on as few pages as
//! possible, auto-fitting the font size and column count.

pub mod font;
pub mod layout;
pub mod names;
pub mod options;
pub mod pdf;
pub mod types;

pub use layout::{entry_position, estimate_text_width, fit_layout, fit_layout_with};
pub use names::{load_names_from_csv, names_from_paths};
pub use options::{CatalogOptions, PaperType};
pub use pdf::{
    generate_catalog_pdf_bytes, generate_catalog_pdf_bytes_with_font, generate_pdf,
};
pub use types::{CatalogError, CatalogLayout, Result};
