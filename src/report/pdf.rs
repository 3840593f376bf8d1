//! PDF rendering of a laid-out [`Document`] via printpdf
//!
//! Every document page becomes one A4 PDF page. Document coordinates run top-down, PDF ones
//! bottom-up, so each y is flipped against the page height. Text is set in the built-in
//! Helvetica faces; characters they cannot show are transliterated or replaced with `?`.

use std::f64::consts::TAU;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
    Polygon, Rgb as PdfRgb,
};

use super::ReportError;
use super::document::{Align, Document, DrawOp, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Page, TextStyle};
use crate::presentation::Rgb;

const TITLE: &str = "CHEM-VIS Analysis Report";
const LAYER: &str = "Report";
const PT_PER_MM: f64 = 72.0 / 25.4;
/// Outline width of stroked rectangles, in millimetres
const BORDER_MM: f64 = 0.25;
const CIRCLE_SEGMENTS: usize = 16;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

pub fn render_pdf(doc: &Document) -> Result<Vec<u8>, ReportError> {
    let (pdf, first_page, first_layer) =
        PdfDocument::new(TITLE, mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), LAYER);
    let fonts = Fonts {
        regular: pdf.add_builtin_font(BuiltinFont::Helvetica).map_err(render_error)?,
        bold: pdf.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_error)?,
    };

    let mut pages = doc.pages().iter();
    if let Some(page) = pages.next() {
        draw_page(&pdf.get_page(first_page).get_layer(first_layer), page, &fonts);
    }
    for page in pages {
        let (page_index, layer_index) =
            pdf.add_page(mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), LAYER);
        draw_page(&pdf.get_page(page_index).get_layer(layer_index), page, &fonts);
    }

    pdf.save_to_bytes().map_err(render_error)
}

fn draw_page(layer: &PdfLayerReference, page: &Page, fonts: &Fonts) {
    for op in &page.ops {
        match op {
            DrawOp::Rect { x, y, w, h, fill, stroke } => {
                let corners = vec![
                    point(*x, *y),
                    point(x + w, *y),
                    point(x + w, y + h),
                    point(*x, y + h),
                ];
                if let Some(fill) = fill {
                    layer.set_fill_color(color(*fill));
                    fill_polygon(layer, corners.clone());
                }
                if let Some(stroke) = stroke {
                    layer.set_outline_color(color(*stroke));
                    layer.set_outline_thickness(thickness(BORDER_MM));
                    layer.add_line(Line { points: corners, is_closed: true });
                }
            }
            DrawOp::Line { x1, y1, x2, y2, color: line_color, width } => {
                layer.set_outline_color(color(*line_color));
                layer.set_outline_thickness(thickness(*width));
                layer.add_line(Line {
                    points: vec![point(*x1, *y1), point(*x2, *y2)],
                    is_closed: false,
                });
            }
            DrawOp::Circle { cx, cy, r, fill } => {
                let ring = (0..CIRCLE_SEGMENTS)
                    .map(|i| {
                        let angle = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
                        point(cx + r * angle.cos(), cy + r * angle.sin())
                    })
                    .collect();
                layer.set_fill_color(color(*fill));
                fill_polygon(layer, ring);
            }
            DrawOp::Text { x, y, text, style } => {
                let text = pdf_text(text);
                if text.trim().is_empty() {
                    continue;
                }
                let font = if style.bold { &fonts.bold } else { &fonts.regular };
                let left = aligned_left(*x, &text, style);
                layer.set_fill_color(color(style.color));
                layer.use_text(text, style.size_pt as f32, mm(left), mm(flip(*y)), font);
            }
        }
    }
}

fn fill_polygon(layer: &PdfLayerReference, ring: Vec<(Point, bool)>) {
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

/// Left edge of a text run placed by its anchor and alignment
fn aligned_left(x: f64, text: &str, style: &TextStyle) -> f64 {
    match style.align {
        Align::Left => x,
        Align::Center => x - style.text_width(text) / 2.0,
        Align::Right => x - style.text_width(text),
    }
}

/// Restrict text to what the built-in fonts can encode
fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '³' => out.push('3'),
            '²' => out.push('2'),
            '°' => {}
            '…' => out.push_str("..."),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn flip(y_mm: f64) -> f64 {
    PAGE_HEIGHT_MM - y_mm
}

fn mm(value: f64) -> Mm {
    Mm(value as f32)
}

fn point(x_mm: f64, y_mm: f64) -> (Point, bool) {
    (Point::new(mm(x_mm), mm(flip(y_mm))), false)
}

fn thickness(width_mm: f64) -> f32 {
    (width_mm * PT_PER_MM) as f32
}

fn color(rgb: Rgb) -> Color {
    let channel = |value: u8| f32::from(value) / 255.0;
    Color::Rgb(PdfRgb::new(channel(rgb.0), channel(rgb.1), channel(rgb.2), None))
}

fn render_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::Render(e.to_string())
}
