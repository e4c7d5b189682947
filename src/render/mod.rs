//! Render output: display list and document backends

mod backend;
mod display;
mod pdf;

pub use backend::{draw_display_list, RenderBackend};
pub use display::{
    fit_text, Color, DisplayItem, DisplayList, DisplayPage, SheetStyle, Stroke, TextRole,
    TextStyle, CELL_NUMBER_BASELINE, ELLIPSIS, HEADER_GAP,
};
pub use pdf::{encode_win_ansi, PdfBackend};

#[cfg(test)]
pub(crate) use backend::recording;
