//! Response Sheet: paginated answer-sheet generator
//!
//! This crate lays out a fixed grid of numbered cells across as many pages as
//! needed and writes the result as a printable document:
//! - Deterministic grid pagination with first-page title reservation
//! - Label width that grows with the largest printed number
//! - Display list decoupled from the document backend
//! - PDF output via the standard Helvetica fonts

pub mod config;
pub mod error;
pub mod layout;
pub mod naming;
pub mod render;
pub mod request;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmSheetGenerator;

// Re-export primary types
pub use config::{GridPreset, SheetConfig};
pub use error::{Result, SheetError};
pub use layout::{
    paginate, CellSpec, GridConfig, GridPaginator, PageDimensions, PageLayout, TitleReservation,
};
pub use naming::{sheet_filename, Clock, FixedClock, SystemClock};
pub use render::{DisplayItem, DisplayList, DisplayPage, PdfBackend, RenderBackend, SheetStyle};
pub use request::{CellCount, SheetRequest};

use tracing::info;

/// Page coordinates, in points from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Page rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// A finished document ready to persist
#[derive(Debug, Clone)]
pub struct GeneratedSheet {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl GeneratedSheet {
    /// Write the document into `dir` under its filename.
    ///
    /// The bytes go to a temporary file in the same directory which is then
    /// renamed into place, so the final path never holds a partial document.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_in(&self, dir: impl AsRef<std::path::Path>) -> Result<std::path::PathBuf> {
        use std::io::Write;

        let dir = dir.as_ref();
        let target = dir.join(&self.filename);

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(&self.bytes)?;
        file.as_file().sync_all()?;
        file.persist(&target)?;

        info!(path = %target.display(), bytes = self.bytes.len(), "saved sheet");
        Ok(target)
    }
}

/// Turns requests into finished documents
#[derive(Debug, Clone, Default)]
pub struct SheetGenerator {
    config: SheetConfig,
}

impl SheetGenerator {
    /// Create a generator, rejecting inconsistent configuration up front
    pub fn new(config: SheetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_preset(preset: GridPreset) -> Self {
        Self {
            config: SheetConfig::preset(preset),
        }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Paginator for a request; the title band only exists when a title does
    pub fn paginator(&self, request: &SheetRequest) -> Result<GridPaginator> {
        let title = request
            .title
            .as_ref()
            .map(|text| TitleReservation::new(text.clone(), self.config.title_height));
        GridPaginator::new(self.config.page, self.config.grid.clone(), title)
    }

    /// Validate the request and compute every page
    pub fn layout(&self, request: &SheetRequest) -> Result<Vec<PageLayout>> {
        request.check_bound(self.config.max_cells)?;
        self.paginator(request)?.paginate(request.total_cells.get())
    }

    /// Number of pages the request produces
    pub fn page_count(&self, request: &SheetRequest) -> Result<usize> {
        request.check_bound(self.config.max_cells)?;
        self.paginator(request)?.page_count(request.total_cells.get())
    }

    /// Draw items for every page, measured with `measurer`
    pub fn display_list(
        &self,
        request: &SheetRequest,
        measurer: &dyn layout::TextMeasurer,
    ) -> Result<DisplayList> {
        request.check_bound(self.config.max_cells)?;
        let paginator = self.paginator(request)?;
        let pages = paginator.paginate(request.total_cells.get())?;
        Ok(DisplayList::build(
            &pages,
            paginator.dimensions(),
            paginator.title(),
            &self.config.style,
            measurer,
        ))
    }

    /// Lay out the request and draw it into `backend`, returning the encoded document
    pub fn render<B: RenderBackend>(
        &self,
        request: &SheetRequest,
        backend: &mut B,
    ) -> Result<Vec<u8>> {
        let list = self.display_list(request, &*backend)?;
        render::draw_display_list(&list, backend)?;
        backend.finalize()
    }

    /// Produce a named PDF for the request
    pub fn generate(&self, request: &SheetRequest, clock: &dyn Clock) -> Result<GeneratedSheet> {
        let mut backend = match &request.title {
            Some(title) => PdfBackend::new().with_title(title.clone()),
            None => PdfBackend::new(),
        };
        let list = self.display_list(request, &backend)?;
        render::draw_display_list(&list, &mut backend)?;
        let bytes = backend.finalize()?;
        let page_count = list.page_count();
        let filename = sheet_filename(
            request.total_cells.get(),
            clock.now(),
            backend.extension(),
        );

        info!(
            cells = request.total_cells.get(),
            pages = page_count,
            filename = %filename,
            "generated sheet"
        );
        Ok(GeneratedSheet {
            filename,
            bytes,
            page_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{Call, RecordingBackend};
    use chrono::{TimeZone, Utc};

    fn request(cells: u32) -> SheetRequest {
        SheetRequest::new(CellCount::new(cells).unwrap())
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 12).unwrap())
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_types_are_send_sync() {
        assert_send_sync::<GridPaginator>();
        assert_send_sync::<SheetGenerator>();
        assert_send_sync::<PageLayout>();
        assert_send_sync::<DisplayList>();
        assert_send_sync::<SheetConfig>();
    }

    #[test]
    fn test_rect_helpers() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(outer.contains_rect(&inner));
        assert!(outer.intersects(&inner));
        assert!(!inner.contains_rect(&outer));
        assert!(!outer.intersects(&Rect::new(100.0, 0.0, 10.0, 10.0)));
        assert_eq!(inner.right(), 30.0);
        assert_eq!(inner.bottom(), 30.0);
    }

    #[test]
    fn test_generate_names_and_counts_pages() {
        let generator = SheetGenerator::default();
        let sheet = generator.generate(&request(130), &clock()).unwrap();

        assert_eq!(sheet.filename, "response_sheet_130_cells_20240501_1430.pdf");
        assert_eq!(sheet.page_count, 2);
        assert!(sheet.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_policy_bound_rejected_before_layout() {
        let generator = SheetGenerator::default();
        let err = generator.generate(&request(1001), &clock()).unwrap_err();
        assert!(matches!(err, SheetError::InvalidInput(_)));
    }

    #[test]
    fn test_title_reduces_first_page() {
        let generator = SheetGenerator::from_preset(GridPreset::Reviewed);
        let titled = request(100).with_title("Chapter 5");
        let pages = generator.layout(&titled).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].last_cell, 96);
        assert_eq!(generator.layout(&request(100)).unwrap().len(), 1);
    }

    #[test]
    fn test_render_failure_propagates() {
        let generator = SheetGenerator::default();
        let mut backend = RecordingBackend::failing_after(10);
        let err = generator.render(&request(20), &mut backend).unwrap_err();

        assert!(matches!(err, SheetError::RendererFailure(_)));
        assert!(!backend.calls.contains(&Call::Finalize));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = SheetConfig::default();
        config.grid.rows = 0;
        assert!(matches!(SheetGenerator::new(config), Err(SheetError::InvalidConfig(_))));
    }

    #[test]
    fn test_save_in_writes_final_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = SheetGenerator::default().generate(&request(7), &clock()).unwrap();
        let path = sheet.save_in(dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), sheet.filename.as_str());
        assert_eq!(std::fs::read(&path).unwrap(), sheet.bytes);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = SheetGenerator::default().generate(&request(7), &clock()).unwrap();
        let err = sheet.save_in(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, SheetError::RendererFailure(_)));
    }
}
