//! Paginated vector document model
//!
//! Coordinates are millimetres from the top-left of an A4 page. Text `y` is the baseline and
//! font sizes are in points. Drawing calls land on the current page; `add_page` appends a page
//! and makes it current, `set_page` revisits one (used for footers once the page count is known).

use crate::presentation::Rgb;
use crate::utils::terminal::truncate_display;

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

const MM_PER_PT: f64 = 25.4 / 72.0;
const LINE_HEIGHT: f64 = 1.15;
/// Average glyph advance of a sans-serif face, as a fraction of the font size
const GLYPH_WIDTH_RATIO: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f64,
    pub bold: bool,
    pub color: Rgb,
    pub align: Align,
}

impl TextStyle {
    pub fn new(size_pt: f64, color: Rgb) -> Self {
        Self { size_pt, bold: false, color, align: Align::Left }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Approximate rendered width of `text` in millimetres
    pub fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.size_pt * MM_PER_PT * GLYPH_WIDTH_RATIO
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgb,
        width: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Rgb,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Striped table that flows across pages, repeating its header on each one
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
    pub start_y: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    /// Top margin on continuation pages and bottom margin on every page
    pub margin_vertical: f64,
    pub head_fill: Rgb,
    pub head_text: Rgb,
    pub body_text: Rgb,
    pub stripe_fill: Rgb,
    pub head_font_pt: f64,
    pub body_font_pt: f64,
    pub cell_padding: f64,
}

#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<Page>,
    current: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document with one empty page
    pub fn new() -> Self {
        Self { pages: vec![Page::default()], current: 0 }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Zero-based index of the page receiving drawing calls
    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        self.current = self.pages.len() - 1;
        self.current
    }

    /// Make a zero-based page current; returns false if it does not exist
    pub fn set_page(&mut self, index: usize) -> bool {
        if index < self.pages.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.current].ops.push(op);
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Rgb) {
        self.push(DrawOp::Rect { x, y, w, h, fill: Some(fill), stroke: None });
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Option<Rgb>, stroke: Option<Rgb>) {
        self.push(DrawOp::Rect { x, y, w, h, fill, stroke });
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb, width: f64) {
        self.push(DrawOp::Line { x1: from.0, y1: from.1, x2: to.0, y2: to.1, color, width });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Rgb) {
        self.push(DrawOp::Circle { cx, cy, r, fill });
    }

    pub fn text(&mut self, text: impl Into<String>, x: f64, y: f64, style: TextStyle) {
        self.push(DrawOp::Text { x, y, text: text.into(), style });
    }

    /// Lay out a table from `spec.start_y` on the current page, breaking pages as needed
    ///
    /// Returns the y coordinate just below the last row. Columns share the width between the
    /// margins equally; cell text that does not fit is clipped with an ellipsis.
    pub fn auto_table(&mut self, spec: &TableSpec) -> f64 {
        let columns = spec.head.len().max(1);
        let table_width = PAGE_WIDTH_MM - spec.margin_left - spec.margin_right;
        let column_width = table_width / columns as f64;
        let head_height = row_height(spec.head_font_pt, spec.cell_padding);
        let body_height = row_height(spec.body_font_pt, spec.cell_padding);
        let bottom = PAGE_HEIGHT_MM - spec.margin_vertical;

        let head_style = TextStyle::new(spec.head_font_pt, spec.head_text).bold();
        let body_style = TextStyle::new(spec.body_font_pt, spec.body_text);

        let mut y = spec.start_y;
        let head_fill = Some(spec.head_fill);
        self.table_row(spec, &spec.head, y, head_height, column_width, head_style, head_fill);
        y += head_height;

        for (index, row) in spec.body.iter().enumerate() {
            if y + body_height > bottom {
                self.add_page();
                y = spec.margin_vertical;
                let head = &spec.head;
                self.table_row(spec, head, y, head_height, column_width, head_style, head_fill);
                y += head_height;
            }

            let fill = (index % 2 == 1).then_some(spec.stripe_fill);
            self.table_row(spec, row, y, body_height, column_width, body_style, fill);
            y += body_height;
        }

        y
    }

    #[allow(clippy::too_many_arguments)]
    fn table_row(
        &mut self,
        spec: &TableSpec,
        cells: &[String],
        y: f64,
        height: f64,
        column_width: f64,
        style: TextStyle,
        fill: Option<Rgb>,
    ) {
        let table_width = PAGE_WIDTH_MM - spec.margin_left - spec.margin_right;
        if let Some(fill) = fill {
            self.fill_rect(spec.margin_left, y, table_width, height, fill);
        }

        let glyph = style.text_width("0").max(f64::EPSILON);
        let max_chars =
            ((column_width - 2.0 * spec.cell_padding) / glyph).floor().max(1.0) as usize;
        let baseline = y + spec.cell_padding + style.size_pt * MM_PER_PT;

        for (col, cell) in cells.iter().enumerate() {
            let x = spec.margin_left + col as f64 * column_width + spec.cell_padding;
            self.text(truncate_display(cell, max_chars), x, baseline, style);
        }
    }
}

fn row_height(font_pt: f64, padding: f64) -> f64 {
    font_pt * MM_PER_PT * LINE_HEIGHT + 2.0 * padding
}
