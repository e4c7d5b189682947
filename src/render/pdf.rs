//! PDF backend built on pdf-writer

use pdf_writer::{Content, Finish, Name, Pdf, Rect as PdfRect, Ref, Str, TextStr};
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, SheetError};
use crate::layout::{FontLibrary, FontWeight, PageDimensions, TextMeasurer};
use crate::render::{Color, RenderBackend, Stroke, TextStyle};
use crate::{Point, Rect};

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

/// Writes sheets as PDF using the standard Helvetica fonts.
///
/// Object ids 1-4 are the catalog, the page tree and the two fonts; page and
/// content objects are allocated as pages are flushed.
pub struct PdfBackend {
    pdf: Pdf,
    fonts: FontLibrary,
    title: Option<String>,
    dimensions: Option<PageDimensions>,
    catalog: Ref,
    page_tree: Ref,
    regular_font: Ref,
    bold_font: Ref,
    next_ref: i32,
    page_refs: Vec<Ref>,
    current: Option<Content>,
    finished: bool,
}

impl Default for PdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend {
    pub fn new() -> Self {
        Self {
            pdf: Pdf::new(),
            fonts: FontLibrary::new(),
            title: None,
            dimensions: None,
            catalog: Ref::new(1),
            page_tree: Ref::new(2),
            regular_font: Ref::new(3),
            bold_font: Ref::new(4),
            next_ref: 5,
            page_refs: Vec::new(),
            current: None,
            finished: false,
        }
    }

    /// Record a document title in the PDF metadata
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Pages flushed so far
    pub fn page_count(&self) -> usize {
        self.page_refs.len() + usize::from(self.current.is_some())
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next_ref);
        self.next_ref += 1;
        id
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finished {
            return Err(SheetError::RendererFailure(
                "document already finalized".into(),
            ));
        }
        Ok(())
    }

    /// Page height and the content stream of the open page
    fn page(&mut self) -> Result<(f32, &mut Content)> {
        self.ensure_open()?;
        let height = self
            .dimensions
            .map(|dims| dims.height)
            .ok_or_else(|| SheetError::RendererFailure("document not started".into()))?;
        let content = self
            .current
            .as_mut()
            .ok_or_else(|| SheetError::RendererFailure("draw call before add_page".into()))?;
        Ok((height, content))
    }

    fn flush_page(&mut self) -> Result<()> {
        let Some(content) = self.current.take() else {
            return Ok(());
        };
        let dims = self
            .dimensions
            .ok_or_else(|| SheetError::RendererFailure("document not started".into()))?;

        let page_id = self.alloc();
        let content_id = self.alloc();

        self.pdf.stream(content_id, &content.finish());

        let mut page = self.pdf.page(page_id);
        page.media_box(PdfRect::new(0.0, 0.0, dims.width, dims.height));
        page.parent(self.page_tree);
        page.contents(content_id);
        page.resources()
            .fonts()
            .pair(FONT_REGULAR, self.regular_font)
            .pair(FONT_BOLD, self.bold_font);
        page.finish();

        self.page_refs.push(page_id);
        debug!(page = self.page_refs.len(), "flushed pdf page");
        Ok(())
    }
}

impl TextMeasurer for PdfBackend {
    fn measure_text_width(&self, text: &str, size: f32, weight: FontWeight) -> f32 {
        self.fonts.measure_text_width(text, size, weight)
    }
}

impl RenderBackend for PdfBackend {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn begin_document(&mut self, dimensions: &PageDimensions) -> Result<()> {
        self.ensure_open()?;
        if self.dimensions.is_some() {
            return Err(SheetError::RendererFailure("document already started".into()));
        }
        self.dimensions = Some(*dimensions);
        Ok(())
    }

    fn add_page(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.dimensions.is_none() {
            return Err(SheetError::RendererFailure("document not started".into()));
        }
        self.flush_page()?;
        self.current = Some(Content::new());
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, stroke: Stroke) -> Result<()> {
        let (height, content) = self.page()?;
        let (r, g, b) = unit_rgb(stroke.color);
        content.save_state();
        content.set_line_width(stroke.width);
        content.set_stroke_rgb(r, g, b);
        content.rect(rect.x, height - rect.y - rect.height, rect.width, rect.height);
        content.stroke();
        content.restore_state();
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<()> {
        let (height, content) = self.page()?;
        let (r, g, b) = unit_rgb(stroke.color);
        content.save_state();
        content.set_line_width(stroke.width);
        content.set_stroke_rgb(r, g, b);
        content.move_to(from.x, height - from.y);
        content.line_to(to.x, height - to.y);
        content.stroke();
        content.restore_state();
        Ok(())
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: TextStyle) -> Result<()> {
        let (height, content) = self.page()?;
        let (r, g, b) = unit_rgb(style.color);
        let font = match style.weight {
            FontWeight::Regular => FONT_REGULAR,
            FontWeight::Bold => FONT_BOLD,
        };
        let encoded = encode_win_ansi(text);

        content.begin_text();
        content.set_font(font, style.size);
        content.set_fill_rgb(r, g, b);
        content.next_line(origin.x, height - origin.y);
        content.show(Str(&encoded));
        content.end_text();
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        self.flush_page()?;
        if self.page_refs.is_empty() {
            return Err(SheetError::RendererFailure("document has no pages".into()));
        }

        self.pdf.catalog(self.catalog).pages(self.page_tree);
        self.pdf
            .pages(self.page_tree)
            .kids(self.page_refs.iter().copied())
            .count(self.page_refs.len() as i32);
        self.pdf
            .type1_font(self.regular_font)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        self.pdf
            .type1_font(self.bold_font)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let info_id = self.alloc();
        let mut info = self.pdf.document_info(info_id);
        info.producer(TextStr(concat!("response-sheet ", env!("CARGO_PKG_VERSION"))));
        if let Some(title) = &self.title {
            info.title(TextStr(title));
        }
        info.finish();

        self.finished = true;
        let pdf = std::mem::replace(&mut self.pdf, Pdf::new());
        let bytes = pdf.finish();
        info!(pages = self.page_refs.len(), bytes = bytes.len(), "finalized pdf");
        Ok(bytes)
    }
}

fn unit_rgb(color: Color) -> (f32, f32, f32) {
    (
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
    )
}

/// Encode text for the standard fonts' WinAnsi encoding.
///
/// Text is NFC-composed first so `e` + U+0301 becomes a single `é` byte.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.nfc()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{2022}' => 0x95,
            '\u{2026}' => 0x85,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn stroke() -> Stroke {
        Stroke {
            width: 0.5,
            color: Color::BLACK,
        }
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Page 1"), b"Page 1".to_vec());
        assert_eq!(encode_win_ansi("\u{2022}"), vec![0x95]);
        assert_eq!(encode_win_ansi("é"), vec![0xe9]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
        assert_eq!(encode_win_ansi("Cafe\u{301}"), b"Caf\xe9".to_vec());
    }

    #[test]
    fn test_two_page_document() {
        let mut backend = PdfBackend::new().with_title("Quiz");
        backend.begin_document(&PageDimensions::A4).unwrap();
        for _ in 0..2 {
            backend.add_page().unwrap();
            backend.draw_rect(Rect::new(40.0, 40.0, 103.0, 30.48), stroke()).unwrap();
            backend
                .draw_line(Point { x: 70.0, y: 40.0 }, Point { x: 70.0, y: 70.48 }, stroke())
                .unwrap();
            backend
                .draw_text(
                    "1",
                    Point { x: 50.0, y: 58.0 },
                    TextStyle {
                        size: 9.0,
                        weight: FontWeight::Regular,
                        color: Color::BLACK,
                    },
                )
                .unwrap();
        }
        assert_eq!(backend.page_count(), 2);

        let bytes = backend.finalize().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Count 2"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
        assert!(contains(&bytes, b"WinAnsiEncoding"));
        assert!(contains(&bytes, b"(Quiz)"));
    }

    #[test]
    fn test_draw_before_page_fails() {
        let mut backend = PdfBackend::new();
        backend.begin_document(&PageDimensions::A4).unwrap();
        let err = backend.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), stroke()).unwrap_err();
        assert!(matches!(err, SheetError::RendererFailure(_)));
    }

    #[test]
    fn test_empty_document_fails() {
        let mut backend = PdfBackend::new();
        backend.begin_document(&PageDimensions::A4).unwrap();
        assert!(backend.finalize().is_err());
    }

    #[test]
    fn test_finalize_twice_fails() {
        let mut backend = PdfBackend::new();
        backend.begin_document(&PageDimensions::A4).unwrap();
        backend.add_page().unwrap();
        assert!(backend.finalize().is_ok());
        assert!(backend.finalize().is_err());
        assert!(backend.add_page().is_err());
    }

    #[test]
    fn test_measures_helvetica() {
        let backend = PdfBackend::new();
        let width = backend.measure_text_width("10", 10.0, FontWeight::Regular);
        assert!((width - 11.12).abs() < 1e-3);
    }
}
