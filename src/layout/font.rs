//! Font metrics for text placement

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Font weight used by sheet text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Anything that can tell how wide a run of text renders.
///
/// Centering of titles, footers and cell numbers goes through this trait so
/// geometry can be checked without a real document backend.
pub trait TextMeasurer {
    /// Advance width of `text` at `size` points
    fn measure_text_width(&self, text: &str, size: f32, weight: FontWeight) -> f32;
}

/// Advance widths for a single font, in 1/1000 em
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Widths of printable ASCII (0x20..=0x7E)
    pub char_widths: Vec<f32>,
    /// Widths of Latin-1 (0xA0..=0xFF); empty when unknown
    pub latin1_widths: Vec<f32>,
    /// Width for everything outside the table
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::helvetica()
    }
}

impl FontMetrics {
    pub fn new(char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            char_widths,
            latin1_widths: Vec::new(),
            default_width,
        }
    }

    pub fn with_latin1(mut self, widths: Vec<f32>) -> Self {
        self.latin1_widths = widths;
        self
    }

    /// Standard Helvetica advance widths
    pub fn helvetica() -> Self {
        Self::new(to_widths(&HELVETICA_WIDTHS), 556.0)
            .with_latin1(to_widths(&HELVETICA_LATIN1_WIDTHS))
    }

    /// Standard Helvetica-Bold advance widths
    pub fn helvetica_bold() -> Self {
        Self::new(to_widths(&HELVETICA_BOLD_WIDTHS), 611.0)
            .with_latin1(to_widths(&HELVETICA_BOLD_LATIN1_WIDTHS))
    }

    /// Get width of a character in 1/1000 em
    pub fn width(&self, c: char) -> f32 {
        match c {
            ' '..='~' => self
                .char_widths
                .get(c as usize - 0x20)
                .copied()
                .unwrap_or(self.default_width),
            '\u{a0}'..='\u{ff}' => self
                .latin1_widths
                .get(c as usize - 0xA0)
                .copied()
                .unwrap_or(self.default_width),
            '\u{2022}' => 350.0,
            '\u{2026}' => 1000.0,
            _ => self.default_width,
        }
    }

    /// Width of a string at the given point size
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.width(c)).sum::<f32>() * size / 1000.0
    }
}

fn to_widths(table: &[u16]) -> Vec<f32> {
    table.iter().map(|&w| f32::from(w)).collect()
}

/// Library of loaded fonts, keyed by weight
#[derive(Debug, Clone)]
pub struct FontLibrary {
    fonts: FxHashMap<FontWeight, FontMetrics>,
}

impl Default for FontLibrary {
    fn default() -> Self {
        let mut fonts = FxHashMap::default();
        fonts.insert(FontWeight::Regular, FontMetrics::helvetica());
        fonts.insert(FontWeight::Bold, FontMetrics::helvetica_bold());
        Self { fonts }
    }
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get font metrics by weight, falling back to regular
    pub fn get(&self, weight: FontWeight) -> Option<&FontMetrics> {
        self.fonts
            .get(&weight)
            .or_else(|| self.fonts.get(&FontWeight::Regular))
    }
}

impl TextMeasurer for FontLibrary {
    fn measure_text_width(&self, text: &str, size: f32, weight: FontWeight) -> f32 {
        match self.get(weight) {
            Some(metrics) => metrics.text_width(text, size),
            None => FontMetrics::helvetica().text_width(text, size),
        }
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    333, 333, 584, 584, 584, 611, 975,
    // A-Z
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    333, 278, 333, 584, 556, 333,
    // a-z
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // {    |    }    ~
    389, 280, 389, 584,
];

#[rustfmt::skip]
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    // nbsp ¡    ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // À-Å, Æ, Ç, È-Ë, Ì-Ï
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // Ð, Ñ, Ò-Ö, ×, Ø, Ù-Ü, Ý, Þ, ß
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // à-å, æ, ç, è-ë, ì-ï
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // ð, ñ, ò-ö, ÷, ø, ù-ü, ý, þ, ÿ
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    // nbsp ¡    ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // À-Å, Æ, Ç, È-Ë, Ì-Ï
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // Ð, Ñ, Ò-Ö, ×, Ø, Ù-Ü, Ý, Þ, ß
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // à-å, æ, ç, è-ë, ì-ï
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    // ð, ñ, ò-ö, ÷, ø, ù-ü, ý, þ, ÿ
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_width() {
        let metrics = FontMetrics::helvetica();
        // 10pt digits are 5.56 wide
        assert!((metrics.text_width("7", 10.0) - 5.56).abs() < 1e-4);
        assert!((metrics.text_width("1000", 9.0) - 4.0 * 5.004).abs() < 1e-3);
    }

    #[test]
    fn test_bullet_and_fallback() {
        let metrics = FontMetrics::helvetica();
        assert_eq!(metrics.width('\u{2022}'), 350.0);
        assert_eq!(metrics.width('日'), metrics.default_width);
    }

    #[test]
    fn test_latin1_widths() {
        let regular = FontMetrics::helvetica();
        assert_eq!(regular.width('é'), 556.0);
        assert_eq!(regular.width('ç'), 500.0);
        assert_eq!(regular.width('Æ'), 1000.0);
        assert_eq!(regular.width('ÿ'), 500.0);

        let bold = FontMetrics::helvetica_bold();
        assert_eq!(bold.width('ñ'), 611.0);
        assert_eq!(bold.width('À'), 722.0);

        // "Café" at 10pt: C 722 + a 556 + f 278 + é 556
        assert!((regular.text_width("Café", 10.0) - 21.12).abs() < 1e-3);
    }

    #[test]
    fn test_bold_is_wider() {
        let library = FontLibrary::new();
        let regular = library.measure_text_width("Response Review", 12.0, FontWeight::Regular);
        let bold = library.measure_text_width("Response Review", 12.0, FontWeight::Bold);
        assert!(bold > regular);
    }

    #[test]
    fn test_empty_string_is_zero() {
        let library = FontLibrary::new();
        assert_eq!(library.measure_text_width("", 8.0, FontWeight::Regular), 0.0);
    }
}
