//! Flat buffer protocol for zero-copy WASM preview
//!
//! Binary format for a display list:
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x52534854 = "RSHT" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     page_count
//! [3]     item_count (all pages)
//! [4]     text_buffer_len
//! [5..]   page data...
//!
//! Per-page:
//!   page_number
//!   item_count
//!   per-item:
//!     opcode
//!     OP_TEXT only: [text_offset, text_len, text_utf16_offset, text_utf16_len,
//!                    weight, rgb]
//!       text_offset/text_len: byte offsets in text_data (UTF-8)
//!       text_utf16_offset/text_utf16_len: offsets for JS substring (after single decode)
//!       weight: 0 regular, 1 bold
//!       rgb: 0x00RRGGBB
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Per-page: [width, height]
//! Per-item:
//!   OP_RECT: [x, y, width, height]
//!   OP_LINE: [x1, y1, x2, y2]
//!   OP_TEXT: [x, y, size]
//! ```
//!
//! Strokes are not encoded; the preview draws every outline with one pen.

use crate::layout::FontWeight;
use crate::render::{DisplayItem, DisplayList, DisplayPage, TextStyle};

/// Magic number for format validation: "RSHT" (Response SHeeT)
pub const MAGIC: u32 = 0x52534854;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 5;

/// Item opcodes
pub const OP_RECT: u32 = 1;
pub const OP_LINE: u32 = 2;
pub const OP_TEXT: u32 = 3;

/// u32 values per page header: [page_number, item_count]
pub const U32_PER_PAGE: usize = 2;

/// f32 values per page header: [width, height]
pub const F32_PER_PAGE: usize = 2;

/// u32 values per text item, opcode included
pub const U32_PER_TEXT: usize = 7;

/// Render buffer for zero-copy WASM transfer
#[derive(Debug, Default)]
pub struct RenderBuffer {
    /// Integer data (opcodes, counts, text offsets)
    pub u32_data: Vec<u32>,
    /// Float data (positions, dimensions)
    pub f32_data: Vec<f32>,
    /// UTF-8 text buffer
    pub text_data: Vec<u8>,
    /// Running UTF-16 offset across text_data
    utf16_text_offset: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all buffers, keeping their allocations
    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
        self.text_data.clear();
        self.utf16_text_offset = 0;
    }

    /// Replace the contents with an encoding of `list`
    pub fn encode(&mut self, list: &DisplayList) {
        self.clear();
        self.reserve_for(list);

        self.u32_data.push(MAGIC);
        self.u32_data.push(SCHEMA_VERSION);
        self.u32_data.push(list.page_count() as u32);
        self.u32_data.push(list.item_count() as u32);
        self.u32_data.push(0); // text_buffer_len, patched below

        for page in &list.pages {
            self.write_page(page);
        }

        self.u32_data[4] = self.text_data.len() as u32;
    }

    /// Size the buffers up front so encoding never reallocates
    fn reserve_for(&mut self, list: &DisplayList) {
        let mut u32_needed = HEADER_SIZE;
        let mut f32_needed = 0;
        let mut text_needed = 0;

        for page in &list.pages {
            u32_needed += U32_PER_PAGE;
            f32_needed += F32_PER_PAGE;
            for item in &page.items {
                match item {
                    DisplayItem::Border { .. } | DisplayItem::Separator { .. } => {
                        u32_needed += 1;
                        f32_needed += 4;
                    }
                    DisplayItem::Text { text, .. } => {
                        u32_needed += U32_PER_TEXT;
                        f32_needed += 3;
                        text_needed += text.len();
                    }
                }
            }
        }

        self.u32_data.reserve(u32_needed);
        self.f32_data.reserve(f32_needed);
        self.text_data.reserve(text_needed);
    }

    fn write_page(&mut self, page: &DisplayPage) {
        self.u32_data.push(page.page_number);
        self.u32_data.push(page.items.len() as u32);
        self.f32_data.push(page.bounds.width);
        self.f32_data.push(page.bounds.height);

        for item in &page.items {
            match item {
                DisplayItem::Border { rect, .. } => {
                    self.u32_data.push(OP_RECT);
                    self.f32_data
                        .extend_from_slice(&[rect.x, rect.y, rect.width, rect.height]);
                }
                DisplayItem::Separator { from, to, .. } => {
                    self.u32_data.push(OP_LINE);
                    self.f32_data.extend_from_slice(&[from.x, from.y, to.x, to.y]);
                }
                DisplayItem::Text {
                    position,
                    text,
                    style,
                    ..
                } => {
                    self.write_text(text, style);
                    self.f32_data
                        .extend_from_slice(&[position.x, position.y, style.size]);
                }
            }
        }
    }

    fn write_text(&mut self, text: &str, style: &TextStyle) {
        let text_offset = self.text_data.len() as u32;
        self.text_data.extend_from_slice(text.as_bytes());
        let text_len = text.len() as u32;

        // UTF-16 offsets let JS slice a single decoded string
        let text_utf16_offset = self.utf16_text_offset as u32;
        let text_utf16_len = text.chars().map(char::len_utf16).sum::<usize>() as u32;
        self.utf16_text_offset += text_utf16_len as usize;

        let weight = match style.weight {
            FontWeight::Regular => 0,
            FontWeight::Bold => 1,
        };

        self.u32_data.extend_from_slice(&[
            OP_TEXT,
            text_offset,
            text_len,
            text_utf16_offset,
            text_utf16_len,
            weight,
            style.color.packed(),
        ]);
    }

    // Accessors for WASM
    // Return u32 instead of usize for explicit WASM contract (wasm32 linear memory uses u32 offsets)

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn f32_ptr(&self) -> u32 {
        self.f32_data.as_ptr() as u32
    }

    pub fn f32_len(&self) -> u32 {
        self.f32_data.len() as u32
    }

    pub fn text_ptr(&self) -> u32 {
        self.text_data.as_ptr() as u32
    }

    pub fn text_len(&self) -> u32 {
        self.text_data.len() as u32
    }
}
