//! Two-up sheet composition
//!
//! A page list is consumed two entries at a time; entry `2k` goes to the
//! left half of sheet `k` and entry `2k + 1` to the right half. Each page is
//! scaled uniformly to fit its half and centered there, upright as a viewer
//! would display it.

use crate::options::SheetGeometry;
use crate::pool::DocumentPool;
use crate::render::{XObjectCache, finish_document, render_sheet};
use crate::types::*;
use lopdf::Document;
use log::{debug, warn};

/// Which half of a landscape sheet a page occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Left,
    Right,
}

impl Half {
    /// Horizontal center of this half
    pub fn center_x(self, geometry: &SheetGeometry) -> f32 {
        match self {
            Half::Left => geometry.width_pt / 4.0,
            Half::Right => 3.0 * geometry.width_pt / 4.0,
        }
    }
}

/// Where one source page is drawn on a sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: PageRef,
    pub half: Half,
    /// Drawn area on the sheet
    pub rect: Rect,
    pub scale: f32,
    /// The source page's visible box, in its own user space
    pub source_box: Rect,
    pub rotation: PageRotation,
}

impl Placement {
    /// Matrix (`a b c d e f`) mapping the source page's user space onto
    /// `rect`, turning it by the page's display rotation
    pub fn matrix(&self) -> [f32; 6] {
        let s = self.scale;
        let Rect {
            x: x0,
            y: y0,
            width: w,
            height: h,
        } = self.source_box;
        let (rx, ry) = (self.rect.x, self.rect.y);

        match self.rotation {
            PageRotation::None => [s, 0.0, 0.0, s, rx - s * x0, ry - s * y0],
            PageRotation::Clockwise90 => [0.0, -s, s, 0.0, rx - s * y0, ry + s * (x0 + w)],
            PageRotation::Rotated180 => {
                [-s, 0.0, 0.0, -s, rx + s * (x0 + w), ry + s * (y0 + h)]
            }
            PageRotation::Clockwise270 => [0.0, s, -s, 0.0, rx + s * (y0 + h), ry - s * x0],
        }
    }
}

/// Geometry of one output sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetLayout {
    pub left: Option<Placement>,
    pub right: Option<Placement>,
}

impl SheetLayout {
    /// Occupied halves, left first
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Uniform scale fitting a `width` x `height` page into one half
pub fn fit_scale(width: f32, height: f32, geometry: &SheetGeometry) -> f32 {
    let scale = (geometry.half_width() / width).min(geometry.half_height() / height);
    if geometry.allow_upscale {
        scale
    } else {
        scale.min(1.0)
    }
}

/// Place a page in a half, centered. `None` for a degenerate source box.
pub fn place_page(
    page: PageRef,
    half: Half,
    source: PageBox,
    geometry: &SheetGeometry,
) -> Option<Placement> {
    if source.is_degenerate() {
        return None;
    }

    let (display_width, display_height) = source.display_size();
    let scale = fit_scale(display_width, display_height, geometry);
    let width = display_width * scale;
    let height = display_height * scale;
    let x = half.center_x(geometry) - width / 2.0;
    let y = geometry.height_pt / 2.0 - height / 2.0;

    Some(Placement {
        page,
        half,
        rect: Rect::new(x, y, width, height),
        scale,
        source_box: source.rect,
        rotation: source.rotation,
    })
}

/// Compute sheet geometry for a page list without rendering anything.
///
/// Produces `ceil(pages.len() / 2)` sheets. Blank entries and a missing
/// final right-hand entry leave their half empty.
pub fn layout_sheets<F>(
    pages: &[PageRef],
    geometry: &SheetGeometry,
    mut page_box: F,
) -> Vec<SheetLayout>
where
    F: FnMut(PageRef) -> Option<PageBox>,
{
    let mut place = |page: Option<&PageRef>, half: Half| -> Option<Placement> {
        let page = *page?;
        if page.is_blank() {
            return None;
        }
        match page_box(page) {
            Some(source) => {
                let placement = place_page(page, half, source, geometry);
                if placement.is_none() {
                    warn!("Skipping page with empty page box: {:?}", page);
                }
                placement
            }
            None => {
                warn!("Skipping page without usable MediaBox: {:?}", page);
                None
            }
        }
    };

    pages
        .chunks(2)
        .map(|pair| SheetLayout {
            left: place(pair.first(), Half::Left),
            right: place(pair.get(1), Half::Right),
        })
        .collect()
}

/// Compose a page list into a new document of landscape sheets
pub fn compose_sheets(
    pool: &DocumentPool,
    pages: &[PageRef],
    geometry: &SheetGeometry,
) -> Result<Document> {
    let layouts = layout_sheets(pages, geometry, |page| pool.page_box(page));

    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();
    let mut cache = XObjectCache::new();
    let mut page_ids = Vec::with_capacity(layouts.len());

    for (index, layout) in layouts.iter().enumerate() {
        debug!(
            "batch {}: sheet {} holds {} pages",
            pool.batch(),
            index,
            layout.placements().count()
        );
        page_ids.push(render_sheet(
            &mut output,
            pool,
            layout,
            geometry,
            pages_tree_id,
            &mut cache,
        )?);
    }

    finish_document(&mut output, pages_tree_id, page_ids);
    Ok(output)
}
