#![cfg(target_arch = "wasm32")]

use response_sheet::wasm::MAGIC;
use response_sheet::WasmSheetGenerator;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn generate_returns_named_pdf() {
    let generator = WasmSheetGenerator::new("standard").unwrap();
    let pdf = generator.generate(130.0, None).unwrap();

    assert_eq!(pdf.page_count(), 2);
    assert!(pdf.filename().starts_with("response_sheet_130_cells_"));
    assert!(pdf.filename().ends_with(".pdf"));
    assert!(pdf.bytes().length() > 0);
}

#[wasm_bindgen_test]
fn page_count_with_title() {
    let generator = WasmSheetGenerator::new("reviewed").unwrap();
    assert_eq!(generator.page_count(100.0, Some("Chapter 5".into())).unwrap(), 2);
    assert_eq!(generator.page_count(100.0, None).unwrap(), 1);
}

#[wasm_bindgen_test]
fn invalid_input_is_an_error() {
    let generator = WasmSheetGenerator::new("standard").unwrap();
    assert!(generator.generate(2.5, None).is_err());
    assert!(generator.page_count(0.0, None).is_err());
    assert!(WasmSheetGenerator::new("hexagonal").is_err());
}

#[wasm_bindgen_test]
fn preview_fills_buffer() {
    let mut generator = WasmSheetGenerator::new("standard").unwrap();
    assert_eq!(generator.preview(7.0, None).unwrap(), 1);
    assert!(generator.u32_len() > 0);
    assert_eq!(generator.buffer().u32_data[0], MAGIC);
}
