//! Display list: render-ready representation of paginated pages

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::layout::{
    CellSpec, FontWeight, PageDimensions, PageLayout, TextMeasurer, TitleReservation,
};
use crate::{Point, Rect};

/// Appended to titles that do not fit across the page
pub const ELLIPSIS: &str = "...";

/// Baseline offset of a cell number below the vertical middle of its cell
pub const CELL_NUMBER_BASELINE: f32 = 3.0;

/// Gap between a column header baseline and the first row
pub const HEADER_GAP: f32 = 4.0;

/// RGB colour, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// Pack into `0x00RRGGBB`
    pub fn packed(&self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// Line settings for borders and separators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

/// Font settings for a text run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
}

/// What a text run is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    Title,
    ColumnHeader,
    CellNumber,
    Footer,
}

/// Sizes and colours used when turning layouts into draw items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetStyle {
    pub line_width: f32,
    pub border_color: Color,
    pub cell_number_size: f32,
    pub footer_size: f32,
    pub footer_color: Color,
    /// Distance from the bottom edge to the footer baseline
    pub footer_offset: f32,
    pub title_size: f32,
    pub header_size: f32,
    pub header_color: Color,
    /// Print subdivision labels above the first row of every page
    pub column_headers: bool,
}

impl Default for SheetStyle {
    fn default() -> Self {
        Self {
            line_width: 0.5,
            border_color: Color::BLACK,
            cell_number_size: 9.0,
            footer_size: 8.0,
            footer_color: Color::gray(100),
            footer_offset: 20.0,
            title_size: 16.0,
            header_size: 7.0,
            header_color: Color::gray(100),
            column_headers: false,
        }
    }
}

impl SheetStyle {
    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.line_width,
            color: self.border_color,
        }
    }
}

/// A display item to render
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// Rectangle outline
    Border { rect: Rect, stroke: Stroke },
    /// Straight line
    Separator { from: Point, to: Point, stroke: Stroke },
    /// Text run; `position` is the left end of the baseline
    Text {
        role: TextRole,
        position: Point,
        text: String,
        style: TextStyle,
    },
}

/// Display list for a single page
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPage {
    pub page_number: u32,
    pub bounds: Rect,
    pub items: Vec<DisplayItem>,
}

impl DisplayPage {
    /// Text runs with the given role, in drawing order
    pub fn texts(&self, role: TextRole) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.items.iter().filter_map(move |item| match item {
            DisplayItem::Text {
                role: r,
                position,
                text,
                ..
            } if *r == role => Some((text.as_str(), *position)),
            _ => None,
        })
    }
}

/// Complete display list for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub dimensions: PageDimensions,
    pub pages: Vec<DisplayPage>,
}

impl DisplayList {
    /// Build display list from paginated layouts
    pub fn build(
        pages: &[PageLayout],
        dimensions: &PageDimensions,
        title: Option<&TitleReservation>,
        style: &SheetStyle,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let pages = pages
            .iter()
            .map(|page| {
                let mut builder = PageBuilder {
                    dimensions,
                    style,
                    measurer,
                    items: Vec::with_capacity(page.cells.len() * 4 + 2),
                };

                if page.has_title {
                    if let Some(title) = title {
                        builder.title(title);
                    }
                }
                if style.column_headers {
                    builder.column_headers(page);
                }
                for cell in &page.cells {
                    builder.cell(cell);
                }
                builder.footer(&page.footer);

                DisplayPage {
                    page_number: page.number,
                    bounds: dimensions.bounds(),
                    items: builder.items,
                }
            })
            .collect();

        DisplayList {
            dimensions: *dimensions,
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of draw items across all pages
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|page| page.items.len()).sum()
    }
}

struct PageBuilder<'a> {
    dimensions: &'a PageDimensions,
    style: &'a SheetStyle,
    measurer: &'a dyn TextMeasurer,
    items: Vec<DisplayItem>,
}

impl PageBuilder<'_> {
    fn title(&mut self, title: &TitleReservation) {
        let style = TextStyle {
            size: self.style.title_size,
            weight: FontWeight::Bold,
            color: Color::BLACK,
        };
        let text = fit_text(
            &title.text,
            self.dimensions.available_width(),
            &style,
            self.measurer,
        );
        let width = self.measure(&text, &style);
        let position = Point {
            x: (self.dimensions.width - width) / 2.0,
            y: self.dimensions.margin + title.height / 2.0 + style.size / 3.0,
        };
        self.text(TextRole::Title, position, text, style);
    }

    fn column_headers(&mut self, page: &PageLayout) {
        let style = TextStyle {
            size: self.style.header_size,
            weight: FontWeight::Regular,
            color: self.style.header_color,
        };
        for cell in page.first_row() {
            for subdivision in &cell.subdivisions {
                let width = self.measure(&subdivision.label, &style);
                let position = Point {
                    x: subdivision.rect.x + (subdivision.rect.width - width) / 2.0,
                    y: cell.bounds.y - HEADER_GAP,
                };
                let label = subdivision.label.to_string();
                self.text(TextRole::ColumnHeader, position, label, style);
            }
        }
    }

    fn cell(&mut self, cell: &CellSpec) {
        let stroke = self.style.stroke();
        let bounds = cell.bounds;

        self.items.push(DisplayItem::Border {
            rect: bounds,
            stroke,
        });

        // Label / response separator
        let label_edge = cell.label.right();
        self.separator(label_edge, bounds.y, bounds.bottom(), stroke);

        // Boundaries between subdivisions
        for subdivision in cell.subdivisions.iter().skip(1) {
            self.separator(subdivision.rect.x, bounds.y, bounds.bottom(), stroke);
        }

        let style = TextStyle {
            size: self.style.cell_number_size,
            weight: FontWeight::Regular,
            color: Color::BLACK,
        };
        let number = cell.number.to_string();
        let width = self.measure(&number, &style);
        let position = Point {
            x: cell.label.x + (cell.label.width - width) / 2.0,
            y: bounds.y + bounds.height / 2.0 + CELL_NUMBER_BASELINE,
        };
        self.text(TextRole::CellNumber, position, number, style);
    }

    fn footer(&mut self, footer: &str) {
        let style = TextStyle {
            size: self.style.footer_size,
            weight: FontWeight::Regular,
            color: self.style.footer_color,
        };
        let width = self.measure(footer, &style);
        let position = Point {
            x: (self.dimensions.width - width) / 2.0,
            y: self.dimensions.height - self.style.footer_offset,
        };
        self.text(TextRole::Footer, position, footer.to_string(), style);
    }

    fn separator(&mut self, x: f32, top: f32, bottom: f32, stroke: Stroke) {
        self.items.push(DisplayItem::Separator {
            from: Point { x, y: top },
            to: Point { x, y: bottom },
            stroke,
        });
    }

    fn text(&mut self, role: TextRole, position: Point, text: String, style: TextStyle) {
        self.items.push(DisplayItem::Text {
            role,
            position,
            text,
            style,
        });
    }

    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        self.measurer.measure_text_width(text, style.size, style.weight)
    }
}

/// Shorten `text` on grapheme boundaries until it fits in `max_width`
pub fn fit_text(
    text: &str,
    max_width: f32,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> String {
    let measure = |s: &str| measurer.measure_text_width(s, style.size, style.weight);
    if measure(text) <= max_width {
        return text.to_string();
    }

    let mut graphemes: Vec<&str> = text.graphemes(true).collect();
    while !graphemes.is_empty() {
        graphemes.pop();
        let candidate = format!("{}{ELLIPSIS}", graphemes.concat().trim_end());
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{paginate, GridConfig};

    /// Every character is exactly `size / 2` wide
    struct HalfEm;

    impl TextMeasurer for HalfEm {
        fn measure_text_width(&self, text: &str, size: f32, _weight: FontWeight) -> f32 {
            text.chars().count() as f32 * size / 2.0
        }
    }

    fn build(
        total: u32,
        grid: GridConfig,
        title: Option<TitleReservation>,
        style: SheetStyle,
    ) -> DisplayList {
        let dims = PageDimensions::A4;
        let pages = paginate(total, dims, grid, title.clone()).unwrap();
        DisplayList::build(&pages, &dims, title.as_ref(), &style, &HalfEm)
    }

    #[test]
    fn test_footer_is_centered() {
        let list = build(7, GridConfig::default(), None, SheetStyle::default());
        let (text, position) = list.pages[0].texts(TextRole::Footer).next().unwrap();

        assert_eq!(text, "Page 1 • Cells 1-7 of 7");
        // 23 chars * 4.0 = 92 wide
        assert!((position.x - (595.0 - 92.0) / 2.0).abs() < 1e-3);
        assert_eq!(position.y, 822.0);
    }

    #[test]
    fn test_cell_number_centered_in_label() {
        let list = build(7, GridConfig::default(), None, SheetStyle::default());
        let (text, position) = list.pages[0].texts(TextRole::CellNumber).next().unwrap();

        assert_eq!(text, "1");
        // label 30 wide, "1" is 4.5 wide at 9pt
        assert!((position.x - (40.0 + (30.0 - 4.5) / 2.0)).abs() < 1e-3);
        assert!((position.y - (40.0 + 30.48 / 2.0 + 3.0)).abs() < 1e-3);
    }

    #[test]
    fn test_items_per_cell() {
        let list = build(3, GridConfig::default(), None, SheetStyle::default());
        // border + separator + number per cell, plus footer
        assert_eq!(list.pages[0].items.len(), 3 * 3 + 1);
    }

    #[test]
    fn test_subdivided_cells_get_extra_separator() {
        let grid = GridConfig::new(4, 25).with_subdivisions(["Response", "Review"]);
        let list = build(1, grid, None, SheetStyle::default());
        let separators = list.pages[0]
            .items
            .iter()
            .filter(|item| matches!(item, DisplayItem::Separator { .. }))
            .count();
        assert_eq!(separators, 2);
    }

    #[test]
    fn test_column_headers_on_every_page() {
        let grid = GridConfig::new(4, 25).with_subdivisions(["Response", "Review"]);
        let style = SheetStyle {
            column_headers: true,
            ..SheetStyle::default()
        };
        let list = build(150, grid, None, style);

        assert_eq!(list.page_count(), 2);
        for page in &list.pages {
            let headers: Vec<_> = page.texts(TextRole::ColumnHeader).map(|(t, _)| t).collect();
            assert_eq!(headers.len(), 8);
            assert_eq!(&headers[..2], &["Response", "Review"]);
        }
        let (_, position) = list.pages[0].texts(TextRole::ColumnHeader).next().unwrap();
        assert_eq!(position.y, 36.0);
    }

    #[test]
    fn test_title_only_on_first_page() {
        let title = TitleReservation::new("Unit 3 Quiz", 40.0);
        let list = build(200, GridConfig::default(), Some(title), SheetStyle::default());

        let (text, position) = list.pages[0].texts(TextRole::Title).next().unwrap();
        assert_eq!(text, "Unit 3 Quiz");
        // 11 chars * 8.0 = 88 wide
        assert!((position.x - (595.0 - 88.0) / 2.0).abs() < 1e-3);
        assert!(position.y > 40.0 && position.y < 80.0);
        assert_eq!(list.pages[1].texts(TextRole::Title).count(), 0);
    }

    #[test]
    fn test_fit_text_truncates_long_titles() {
        let style = TextStyle {
            size: 10.0,
            weight: FontWeight::Bold,
            color: Color::BLACK,
        };
        // 5 wide per char, 50 fits 10 chars
        assert_eq!(fit_text("short", 50.0, &style, &HalfEm), "short");
        assert_eq!(fit_text("a much longer title", 50.0, &style, &HalfEm), "a much...");
        assert_eq!(fit_text("wide", 5.0, &style, &HalfEm), "...");
    }

    #[test]
    fn test_color_packing() {
        assert_eq!(Color::gray(100).packed(), 0x646464);
        assert_eq!(Color::BLACK.packed(), 0);
    }
}
