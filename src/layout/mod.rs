//! Grid layout and pagination

mod engine;
pub mod font;
mod pagination;

pub use engine::{
    digit_count, label_width, paginate, CellGeometry, GridConfig, GridPaginator,
    PageDimensions, TitleReservation, LABEL_DIGIT_WIDTH, LABEL_MIN_WIDTH, LABEL_PADDING,
    RESPONSE_GAP,
};
pub use font::{FontLibrary, FontMetrics, FontWeight, TextMeasurer};
pub use pagination::{footer_text, CellSpec, PageLayout, SubdivisionSpec};
