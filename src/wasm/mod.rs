//! WASM bindings for the sheet generator

mod flat_buffer;

pub use flat_buffer::{
    RenderBuffer, F32_PER_PAGE, HEADER_SIZE, MAGIC, OP_LINE, OP_RECT, OP_TEXT, SCHEMA_VERSION,
    U32_PER_PAGE, U32_PER_TEXT,
};

use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;

use crate::layout::FontLibrary;
use crate::{CellCount, Clock, GridPreset, Result, SheetGenerator, SheetRequest};

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Browser clock; `chrono`'s wall clock is unavailable on wasm32-unknown-unknown
struct JsClock;

impl Clock for JsClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64)
            .unwrap_or_default()
    }
}

/// Build a request from JS arguments
fn request(total_cells: f64, title: Option<String>) -> Result<SheetRequest> {
    let request = SheetRequest::new(CellCount::try_from(total_cells)?);
    Ok(match title {
        Some(title) => request.with_title(title),
        None => request,
    })
}

fn js_error(err: crate::SheetError) -> JsError {
    JsError::new(&format!("{}: {}", err.code(), err))
}

/// A generated PDF handed back to JS
#[wasm_bindgen]
pub struct GeneratedPdf {
    filename: String,
    bytes: Vec<u8>,
    page_count: usize,
}

#[wasm_bindgen]
impl GeneratedPdf {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    /// Copy of the document bytes
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.bytes.as_slice())
    }

    #[wasm_bindgen(getter, js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

/// WASM-exposed generator wrapper
#[wasm_bindgen]
pub struct WasmSheetGenerator {
    generator: SheetGenerator,
    fonts: FontLibrary,
    buffer: RenderBuffer,
}

#[wasm_bindgen]
impl WasmSheetGenerator {
    /// Create a generator for a preset name ("standard" or "reviewed")
    #[wasm_bindgen(constructor)]
    pub fn new(preset: &str) -> std::result::Result<WasmSheetGenerator, JsError> {
        let preset: GridPreset = preset.parse().map_err(js_error)?;
        Ok(Self::with_preset(preset))
    }

    /// Generate a PDF for `total_cells` cells
    pub fn generate(
        &self,
        total_cells: f64,
        title: Option<String>,
    ) -> std::result::Result<GeneratedPdf, JsError> {
        let request = request(total_cells, title).map_err(js_error)?;
        let sheet = self
            .generator
            .generate(&request, &JsClock)
            .map_err(js_error)?;

        Ok(GeneratedPdf {
            filename: sheet.filename,
            bytes: sheet.bytes,
            page_count: sheet.page_count,
        })
    }

    /// Number of pages `total_cells` would produce
    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(
        &self,
        total_cells: f64,
        title: Option<String>,
    ) -> std::result::Result<usize, JsError> {
        let request = request(total_cells, title).map_err(js_error)?;
        self.generator.page_count(&request).map_err(js_error)
    }

    /// Encode the sheet's display list into the flat buffer, returning the page count
    pub fn preview(
        &mut self,
        total_cells: f64,
        title: Option<String>,
    ) -> std::result::Result<usize, JsError> {
        let request = request(total_cells, title).map_err(js_error)?;
        self.encode_preview(&request).map_err(js_error)
    }

    // Buffer accessors for zero-copy reads from JS

    #[wasm_bindgen(js_name = u32Ptr)]
    pub fn u32_ptr(&self) -> u32 {
        self.buffer.u32_ptr()
    }

    #[wasm_bindgen(js_name = u32Len)]
    pub fn u32_len(&self) -> u32 {
        self.buffer.u32_len()
    }

    #[wasm_bindgen(js_name = f32Ptr)]
    pub fn f32_ptr(&self) -> u32 {
        self.buffer.f32_ptr()
    }

    #[wasm_bindgen(js_name = f32Len)]
    pub fn f32_len(&self) -> u32 {
        self.buffer.f32_len()
    }

    #[wasm_bindgen(js_name = textPtr)]
    pub fn text_ptr(&self) -> u32 {
        self.buffer.text_ptr()
    }

    #[wasm_bindgen(js_name = textLen)]
    pub fn text_len(&self) -> u32 {
        self.buffer.text_len()
    }
}

impl WasmSheetGenerator {
    pub fn with_preset(preset: GridPreset) -> Self {
        Self {
            generator: SheetGenerator::from_preset(preset),
            fonts: FontLibrary::new(),
            buffer: RenderBuffer::new(),
        }
    }

    pub fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    fn encode_preview(&mut self, request: &SheetRequest) -> Result<usize> {
        let list = self.generator.display_list(request, &self.fonts)?;
        self.buffer.encode(&list);
        Ok(list.page_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SheetError;

    #[test]
    fn test_request_from_js_arguments() {
        let req = request(130.0, Some("  Unit 3 ".into())).unwrap();
        assert_eq!(req.total_cells.get(), 130);
        assert_eq!(req.title.as_deref(), Some("Unit 3"));

        assert!(matches!(request(2.5, None), Err(SheetError::InvalidInput(_))));
        assert!(matches!(request(-5.0, None), Err(SheetError::InvalidInput(_))));
    }

    #[test]
    fn test_preview_fills_buffer() {
        let mut wasm = WasmSheetGenerator::with_preset(GridPreset::Standard);
        let pages = wasm.encode_preview(&request(130.0, None).unwrap()).unwrap();

        let buf = wasm.buffer();
        assert_eq!(pages, 2);
        assert_eq!(buf.u32_data[0], MAGIC);
        assert_eq!(buf.u32_data[2], 2);
        assert_eq!(buf.u32_data[HEADER_SIZE], 1, "first page number");
        assert!(std::str::from_utf8(&buf.text_data)
            .unwrap()
            .contains("Page 2 • Cells 126-130 of 130"));
    }

    #[test]
    fn test_preview_rejects_over_bound() {
        let mut wasm = WasmSheetGenerator::with_preset(GridPreset::Reviewed);
        let err = wasm
            .encode_preview(&request(1001.0, None).unwrap())
            .unwrap_err();
        assert!(matches!(err, SheetError::InvalidInput(_)));
    }
}
