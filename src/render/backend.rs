//! Document backend contract and display list replay

use tracing::debug;

use crate::error::Result;
use crate::layout::{PageDimensions, TextMeasurer};
use crate::render::{DisplayItem, DisplayList, Stroke, TextStyle};
use crate::{Point, Rect};

/// A document writer that can draw sheet pages.
///
/// Coordinates are in points with the origin at the top-left corner of the
/// page; backends with a different origin convert on output.
pub trait RenderBackend: TextMeasurer {
    /// File extension of the produced format, without the dot
    fn extension(&self) -> &'static str;

    /// Start a document whose pages all have `dimensions`
    fn begin_document(&mut self, dimensions: &PageDimensions) -> Result<()>;

    /// Start a new page; subsequent draw calls target it
    fn add_page(&mut self) -> Result<()>;

    fn draw_rect(&mut self, rect: Rect, stroke: Stroke) -> Result<()>;

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<()>;

    /// Draw `text` with its baseline starting at `origin`
    fn draw_text(&mut self, text: &str, origin: Point, style: TextStyle) -> Result<()>;

    /// Finish the document and return its encoded bytes
    fn finalize(&mut self) -> Result<Vec<u8>>;
}

/// Replay a display list into a backend, one page at a time.
///
/// The first failing call aborts the replay.
pub fn draw_display_list<B>(list: &DisplayList, backend: &mut B) -> Result<()>
where
    B: RenderBackend + ?Sized,
{
    backend.begin_document(&list.dimensions)?;

    for page in &list.pages {
        backend.add_page()?;
        for item in &page.items {
            match item {
                DisplayItem::Border { rect, stroke } => backend.draw_rect(*rect, *stroke)?,
                DisplayItem::Separator { from, to, stroke } => {
                    backend.draw_line(*from, *to, *stroke)?
                }
                DisplayItem::Text {
                    position,
                    text,
                    style,
                    ..
                } => backend.draw_text(text, *position, *style)?,
            }
        }
        debug!(page = page.page_number, items = page.items.len(), "drew page");
    }

    Ok(())
}
