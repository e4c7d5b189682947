//! Pagination output: pages, cells and footers

use std::ops::RangeInclusive;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::Rect;

/// A named slice of a cell's response area
#[derive(Debug, Clone, PartialEq)]
pub struct SubdivisionSpec {
    pub label: Arc<str>,
    pub rect: Rect,
}

/// Placement of a single numbered cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellSpec {
    /// Global cell number (1-based, across the whole document)
    pub number: u32,
    /// Page-local row (0-based)
    pub row: u32,
    /// Page-local column (0-based)
    pub column: u32,
    /// Outer border of the cell
    pub bounds: Rect,
    /// Area holding the printed number
    pub label: Rect,
    /// Area to the right of the label, after the internal gap
    pub response: Rect,
    /// Equal-width slices of `response`; empty when the grid is not subdivided
    pub subdivisions: SmallVec<[SubdivisionSpec; 2]>,
}

/// Layout information for a page
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Page number (1-based)
    pub number: u32,
    /// Cells in row-major order
    pub cells: Vec<CellSpec>,
    pub first_cell: u32,
    pub last_cell: u32,
    pub total_cells: u32,
    /// Footer line, e.g. `Page 2 • Cells 126-130 of 130`
    pub footer: String,
    /// Whether the page carries the title band
    pub has_title: bool,
}

impl PageLayout {
    pub(crate) fn new(
        number: u32,
        cells: Vec<CellSpec>,
        first_cell: u32,
        last_cell: u32,
        total_cells: u32,
        has_title: bool,
    ) -> Self {
        Self {
            number,
            footer: footer_text(number, first_cell, last_cell, total_cells),
            cells,
            first_cell,
            last_cell,
            total_cells,
            has_title,
        }
    }

    /// Global cell numbers printed on this page
    pub fn cell_range(&self) -> RangeInclusive<u32> {
        self.first_cell..=self.last_cell
    }

    /// Number of cells on this page
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if this page contains a given cell number
    pub fn contains_cell(&self, number: u32) -> bool {
        self.cell_range().contains(&number)
    }

    /// Cells in the page's top row
    pub fn first_row(&self) -> impl Iterator<Item = &CellSpec> {
        self.cells.iter().take_while(|cell| cell.row == 0)
    }
}

/// Footer line for a page
pub fn footer_text(page: u32, first: u32, last: u32, total: u32) -> String {
    format!("Page {page} \u{2022} Cells {first}-{last} of {total}")
}
