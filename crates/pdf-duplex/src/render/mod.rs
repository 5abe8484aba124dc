//! PDF rendering for composed sheets
//!
//! - Creating Form XObjects from source pages
//! - Building landscape output pages from sheet layouts
//! - Deep copying PDF objects between documents

mod page;
mod xobject;

pub use page::{finish_document, render_sheet};
pub use xobject::{
    XObjectCache, copy_object_deep, create_page_xobject, get_page_box, inherited_attribute,
};
