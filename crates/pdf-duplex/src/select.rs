//! Page selection: front pair (pages 1-2) and back pair (pages 3-4) of
//! every document in a batch, padded with the blank page.

use crate::constants::PAGES_PER_SIDE;
use crate::pool::DocumentPool;
use crate::types::PageRef;

/// Front and back page lists of one batch.
///
/// Both lists hold exactly `PAGES_PER_SIDE` entries per document, in
/// document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub front: Vec<PageRef>,
    pub back: Vec<PageRef>,
}

impl Selection {
    /// Positions filled with the blank page across both lists
    pub fn blank_count(&self) -> usize {
        self.front
            .iter()
            .chain(self.back.iter())
            .filter(|page| page.is_blank())
            .count()
    }

    /// Positions referencing a real source page across both lists
    pub fn real_count(&self) -> usize {
        self.front.len() + self.back.len() - self.blank_count()
    }
}

/// Select the front and back pairs of every document in the pool
pub fn select_pages(pool: &DocumentPool) -> Selection {
    let page_counts: Vec<usize> = pool.documents().iter().map(|d| d.page_count()).collect();
    select_from_counts(&page_counts)
}

/// Select pages given only each document's page count.
///
/// Short documents are padded, never rejected.
pub fn select_from_counts(page_counts: &[usize]) -> Selection {
    let mut selection = Selection {
        front: Vec::with_capacity(page_counts.len() * PAGES_PER_SIDE),
        back: Vec::with_capacity(page_counts.len() * PAGES_PER_SIDE),
    };

    for (document, &page_count) in page_counts.iter().enumerate() {
        for position in 0..PAGES_PER_SIDE {
            selection
                .front
                .push(page_or_blank(document, position, page_count));
        }
        for position in PAGES_PER_SIDE..2 * PAGES_PER_SIDE {
            selection
                .back
                .push(page_or_blank(document, position, page_count));
        }
    }

    selection
}

fn page_or_blank(document: usize, position: usize, page_count: usize) -> PageRef {
    if position < page_count {
        PageRef::page(document, position)
    } else {
        PageRef::blank()
    }
}
