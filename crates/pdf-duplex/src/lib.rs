pub mod batch;
pub mod compose;
pub mod constants;
pub mod io;
mod options;
pub mod pool;
pub mod render;
pub mod reverse;
pub mod select;
mod stats;
pub mod two_up;
mod types;

pub use batch::{BatchImposer, ImposedBatch, impose_batch, impose_pool};
pub use compose::{Half, Placement, SheetLayout, compose_sheets, layout_sheets};
pub use io::{load_pdf, save_pdf, scan_input_dir};
pub use options::*;
pub use pool::{DocumentPool, SourceDocument};
pub use reverse::reverse_pairs;
pub use select::{Selection, select_from_counts, select_pages};
pub use stats::{calculate_statistics, collect_page_counts};
pub use two_up::{two_up, two_up_document};
pub use types::*;
