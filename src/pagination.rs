//! Pagination – splits ordered content into pages.
//!
//! Handles:
//! - Fixed-capacity card sheets ([`chunk`] + [`pad`])
//! - Variable-height table rows ([`paginate_rows`])

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Row-major card grid of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub columns: usize,
    pub rows: usize,
}

impl GridSpec {
    /// Duplex flashcard sheet: 3 columns × 4 rows.
    pub const FLASHCARDS: GridSpec = GridSpec { columns: 3, rows: 4 };
    /// Academic preview sheet: 2 × 2.
    pub const ACADEMIC: GridSpec = GridSpec { columns: 2, rows: 2 };

    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    /// `(row, column)` of a row-major slot.
    pub fn position(&self, slot: usize) -> (usize, usize) {
        (slot / self.columns, slot % self.columns)
    }
}

/// Split `items` into pages of at most `page_size` items.
///
/// Produces `ceil(len / page_size)` pages; only the last may be short and an
/// empty input yields no pages.
///
/// # Panics
/// Panics if `page_size` is zero.
pub fn chunk<T: Clone>(items: &[T], page_size: usize) -> Vec<Vec<T>> {
    assert!(page_size > 0, "page size must be positive");
    items.chunks(page_size).map(<[T]>::to_vec).collect()
}

/// Expand a page into exactly `capacity` slots, empty slots trailing.
///
/// Items beyond `capacity` are dropped; callers chunk first.
pub fn pad<T: Clone>(page: &[T], capacity: usize) -> Vec<Option<T>> {
    (0..capacity).map(|i| page.get(i).cloned()).collect()
}

/// Greedily assign rows of the given heights to pages of height `budget`.
///
/// Each returned range indexes into `row_heights`. A row taller than the
/// budget is placed alone on its own page. Zero rows still produce one
/// (empty) page so headers and footers have somewhere to go.
pub fn paginate_rows(row_heights: &[f32], budget: f32) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut used = 0.0f32;

    for (i, &height) in row_heights.iter().enumerate() {
        if used + height > budget && i > start {
            pages.push(start..i);
            start = i;
            used = 0.0;
        }
        if height > budget {
            log::warn!("table row {i} ({height:.1}pt) exceeds page budget ({budget:.1}pt)");
        }
        used += height;
    }

    if start < row_heights.len() || pages.is_empty() {
        pages.push(start..row_heights.len());
    }
    pages
}
