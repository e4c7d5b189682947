//! Grid pagination engine

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{Result, SheetError};
use crate::layout::pagination::{CellSpec, PageLayout, SubdivisionSpec};
use crate::Rect;

/// Smallest width of the number label area
pub const LABEL_MIN_WIDTH: f32 = 30.0;

/// Label width added per digit of the largest cell number
pub const LABEL_DIGIT_WIDTH: f32 = 8.0;

/// Label padding on top of the digits
pub const LABEL_PADDING: f32 = 10.0;

/// Gap between the label area and the response area
pub const RESPONSE_GAP: f32 = 2.0;

/// Page size and margin, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageDimensions {
    fn default() -> Self {
        Self::A4
    }
}

impl PageDimensions {
    /// A4 at 72 points per inch with a 40 point margin
    pub const A4: Self = Self {
        width: 595.0,
        height: 842.0,
        margin: 40.0,
    };

    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Get usable content width
    pub fn available_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Get usable content height
    pub fn available_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    /// Whole page as a rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        let finite_positive = |v: f32| v.is_finite() && v > 0.0;
        if !finite_positive(self.width) || !finite_positive(self.height) {
            return Err(SheetError::InvalidConfig(format!(
                "page size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.margin.is_finite() || self.margin <= 0.0 {
            return Err(SheetError::InvalidConfig(format!(
                "margin must be positive, got {}",
                self.margin
            )));
        }
        if self.margin * 2.0 >= self.width || self.margin * 2.0 >= self.height {
            return Err(SheetError::InvalidConfig(format!(
                "margin {} leaves no room on a {}x{} page",
                self.margin, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Rows, columns and optional response subdivisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: u32,
    pub rows: u32,
    /// Named slices of the response area, left to right
    pub subdivisions: Vec<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(5, 25)
    }
}

impl GridConfig {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            subdivisions: Vec::new(),
        }
    }

    pub fn with_subdivisions<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdivisions = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Cells on a page without a title band
    pub fn cells_per_page(&self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(SheetError::InvalidConfig(format!(
                "grid needs at least one column and one row, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.columns.checked_mul(self.rows).is_none() {
            return Err(SheetError::InvalidConfig(format!(
                "grid {}x{} is too large",
                self.columns, self.rows
            )));
        }
        Ok(())
    }
}

/// Space taken by the title on the first page
#[derive(Debug, Clone, PartialEq)]
pub struct TitleReservation {
    pub text: String,
    pub height: f32,
}

impl TitleReservation {
    pub fn new(text: impl Into<String>, height: f32) -> Self {
        Self {
            text: text.into(),
            height,
        }
    }
}

/// Cell sizing for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub cell_width: f32,
    pub cell_height: f32,
    pub label_width: f32,
    pub response_width: f32,
    /// Width of each subdivision; equals `response_width` when there are none
    pub subdivision_width: f32,
}

/// Number of base-10 digits in `n`
pub fn digit_count(n: u32) -> u32 {
    n.checked_ilog10().map_or(1, |log| log + 1)
}

/// Width of the number label for a sheet whose largest number is `total_cells`
pub fn label_width(total_cells: u32) -> f32 {
    let digits = digit_count(total_cells) as f32;
    (digits * LABEL_DIGIT_WIDTH + LABEL_PADDING).max(LABEL_MIN_WIDTH)
}

/// Computes page layouts for a fixed grid.
///
/// The paginator is validated on construction and is immutable afterwards, so
/// one instance can serve any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct GridPaginator {
    dims: PageDimensions,
    grid: GridConfig,
    title: Option<TitleReservation>,
    labels: Vec<Arc<str>>,
}

impl GridPaginator {
    pub fn new(
        dims: PageDimensions,
        grid: GridConfig,
        title: Option<TitleReservation>,
    ) -> Result<Self> {
        dims.validate()?;
        grid.validate()?;

        if let Some(title) = &title {
            if !title.height.is_finite() || title.height <= 0.0 {
                return Err(SheetError::InvalidConfig(format!(
                    "title height must be positive, got {}",
                    title.height
                )));
            }
            if grid.rows < 2 {
                return Err(SheetError::LayoutOverflow(
                    "title leaves no rows on the first page".into(),
                ));
            }
            let available = dims.available_height();
            if title.height >= available {
                return Err(SheetError::LayoutOverflow(format!(
                    "title height {} does not fit in {available}",
                    title.height
                )));
            }
            let cell_height = available / grid.rows as f32;
            let grid_bottom =
                dims.margin + title.height + (grid.rows - 1) as f32 * cell_height;
            if grid_bottom > dims.height {
                return Err(SheetError::LayoutOverflow(format!(
                    "first page grid ends at {grid_bottom}, past the page edge {}",
                    dims.height
                )));
            }
        }

        let labels = grid
            .subdivisions
            .iter()
            .map(|label| Arc::from(label.as_str()))
            .collect();

        Ok(Self {
            dims,
            grid,
            title,
            labels,
        })
    }

    pub fn dimensions(&self) -> &PageDimensions {
        &self.dims
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn title(&self) -> Option<&TitleReservation> {
        self.title.as_ref()
    }

    /// Cells on pages without the title band
    pub fn page_capacity(&self) -> usize {
        self.grid.cells_per_page() as usize
    }

    /// Cells on the first page
    pub fn first_page_capacity(&self) -> usize {
        match self.title {
            Some(_) => (self.grid.columns * (self.grid.rows - 1)) as usize,
            None => self.page_capacity(),
        }
    }

    /// Cell sizing for a sheet of `total_cells` cells
    pub fn geometry(&self, total_cells: u32) -> Result<CellGeometry> {
        let cell_width = self.dims.available_width() / self.grid.columns as f32;
        let cell_height = self.dims.available_height() / self.grid.rows as f32;
        let label_width = label_width(total_cells);
        let response_width = cell_width - label_width - RESPONSE_GAP;

        if response_width <= 0.0 {
            return Err(SheetError::LayoutOverflow(format!(
                "{} columns leave no response area: cell width {cell_width}, label width {label_width}",
                self.grid.columns
            )));
        }

        let subdivision_width = match self.labels.len() {
            0 => response_width,
            k => response_width / k as f32,
        };

        Ok(CellGeometry {
            cell_width,
            cell_height,
            label_width,
            response_width,
            subdivision_width,
        })
    }

    /// Number of pages needed, without placing any cell
    pub fn page_count(&self, total_cells: u32) -> Result<usize> {
        check_cell_count(total_cells)?;
        self.geometry(total_cells)?;

        let total = total_cells as usize;
        let first = self.first_page_capacity();
        let rest = self.page_capacity();

        Ok(if total <= first {
            1
        } else {
            1 + (total - first).div_ceil(rest)
        })
    }

    /// Lay out every cell of the sheet, page by page
    pub fn paginate(&self, total_cells: u32) -> Result<Vec<PageLayout>> {
        let page_count = self.page_count(total_cells)?;
        let geometry = self.geometry(total_cells)?;

        let mut pages = Vec::with_capacity(page_count);
        let mut remaining = total_cells as usize;
        let mut next_index = 1u32;
        let mut number = 1u32;

        while remaining > 0 {
            let titled = number == 1 && self.title.is_some();
            let (capacity, offset) = match (&self.title, titled) {
                (Some(title), true) => (self.first_page_capacity(), title.height),
                _ => (self.page_capacity(), 0.0),
            };
            let count = capacity.min(remaining);
            let origin_y = self.dims.margin + offset;

            let cells = (0..count)
                .map(|i| self.place_cell(&geometry, i, origin_y, next_index + i as u32))
                .collect();

            let last = next_index + count as u32 - 1;
            debug!(page = number, first = next_index, last, "paginated page");
            pages.push(PageLayout::new(
                number,
                cells,
                next_index,
                last,
                total_cells,
                titled,
            ));

            next_index += count as u32;
            remaining -= count;
            number += 1;
        }

        Ok(pages)
    }

    fn place_cell(
        &self,
        geometry: &CellGeometry,
        index: usize,
        origin_y: f32,
        number: u32,
    ) -> CellSpec {
        let columns = self.grid.columns as usize;
        let row = (index / columns) as u32;
        let column = (index % columns) as u32;

        let x = self.dims.margin + column as f32 * geometry.cell_width;
        let y = origin_y + row as f32 * geometry.cell_height;
        let height = geometry.cell_height;

        let response = Rect::new(
            x + geometry.label_width + RESPONSE_GAP,
            y,
            geometry.response_width,
            height,
        );

        let subdivisions: SmallVec<[SubdivisionSpec; 2]> = self
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| SubdivisionSpec {
                label: Arc::clone(label),
                rect: Rect::new(
                    response.x + i as f32 * geometry.subdivision_width,
                    y,
                    geometry.subdivision_width,
                    height,
                ),
            })
            .collect();

        CellSpec {
            number,
            row,
            column,
            bounds: Rect::new(x, y, geometry.cell_width, height),
            label: Rect::new(x, y, geometry.label_width, height),
            response,
            subdivisions,
        }
    }
}

fn check_cell_count(total_cells: u32) -> Result<()> {
    if total_cells == 0 {
        return Err(SheetError::InvalidInput(
            "cell count must be at least 1".into(),
        ));
    }
    Ok(())
}

/// One-shot pagination of `total_cells` cells
pub fn paginate(
    total_cells: u32,
    dims: PageDimensions,
    grid: GridConfig,
    title: Option<TitleReservation>,
) -> Result<Vec<PageLayout>> {
    check_cell_count(total_cells)?;
    GridPaginator::new(dims, grid, title)?.paginate(total_cells)
}
