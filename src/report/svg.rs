//! SVG rendering of a laid-out [`Document`] via plotters
//!
//! Pages are stacked top to bottom in a single SVG canvas with a thin gap between them.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use super::ReportError;
use super::document::{Align, Document, DrawOp, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Page, TextStyle};
use crate::presentation::Rgb;

pub const PX_PER_MM: f64 = 4.0;
const PAGE_GAP_PX: u32 = 24;
const MM_PER_PT: f64 = 25.4 / 72.0;
const GAP_COLOR: RGBColor = RGBColor(229, 231, 235);

pub fn render_svg(doc: &Document) -> Result<String, ReportError> {
    let page_w = px(PAGE_WIDTH_MM) as u32;
    let page_h = px(PAGE_HEIGHT_MM) as u32;
    let pages = doc.page_count() as u32;
    let total_h = pages * page_h + pages.saturating_sub(1) * PAGE_GAP_PX;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (page_w, total_h)).into_drawing_area();
        root.fill(&GAP_COLOR).map_err(render_error)?;

        for (index, page) in doc.pages().iter().enumerate() {
            let top = index as u32 * (page_h + PAGE_GAP_PX);
            let area = root.clone().shrink((0, top), (page_w, page_h));
            area.fill(&WHITE).map_err(render_error)?;
            draw_page(&area, page)?;
        }

        root.present().map_err(render_error)?;
    }

    Ok(svg)
}

fn draw_page<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    page: &Page,
) -> Result<(), ReportError> {
    for op in &page.ops {
        match op {
            DrawOp::Rect { x, y, w, h, fill, stroke } => {
                let corners = [point(*x, *y), point(x + w, y + h)];
                if let Some(fill) = fill {
                    area.draw(&Rectangle::new(corners, color(*fill).filled()))
                        .map_err(render_error)?;
                }
                if let Some(stroke) = stroke {
                    area.draw(&Rectangle::new(corners, color(*stroke).stroke_width(1)))
                        .map_err(render_error)?;
                }
            }
            DrawOp::Line { x1, y1, x2, y2, color: line_color, width } => {
                let stroke = (px(*width).round() as u32).max(1);
                area.draw(&PathElement::new(
                    vec![point(*x1, *y1), point(*x2, *y2)],
                    color(*line_color).stroke_width(stroke),
                ))
                .map_err(render_error)?;
            }
            DrawOp::Circle { cx, cy, r, fill } => {
                let radius = (px(*r).round() as i32).max(1);
                area.draw(&Circle::new(point(*cx, *cy), radius, color(*fill).filled()))
                    .map_err(render_error)?;
            }
            DrawOp::Text { x, y, text, style } => {
                if text.trim().is_empty() {
                    continue;
                }
                area.draw(&Text::new(text.as_str(), point(*x, *y), font(style)))
                    .map_err(render_error)?;
            }
        }
    }
    Ok(())
}

fn font(style: &TextStyle) -> plotters::style::TextStyle<'static> {
    let weight = if style.bold { FontStyle::Bold } else { FontStyle::Normal };
    let h_pos = match style.align {
        Align::Left => HPos::Left,
        Align::Center => HPos::Center,
        Align::Right => HPos::Right,
    };

    FontDesc::new(FontFamily::SansSerif, px(style.size_pt * MM_PER_PT), weight)
        .color(&color(style.color))
        .pos(Pos::new(h_pos, VPos::Bottom))
}

fn px(mm: f64) -> f64 {
    mm * PX_PER_MM
}

fn point(x_mm: f64, y_mm: f64) -> (i32, i32) {
    (px(x_mm).round() as i32, px(y_mm).round() as i32)
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn render_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::palette;

    #[test]
    fn test_single_page_dimensions() {
        let svg = render_svg(&Document::new()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("width=\"840\""));
        assert!(svg.contains("height=\"1188\""));
    }

    #[test]
    fn test_pages_are_stacked() {
        let mut doc = Document::new();
        doc.add_page();
        doc.add_page();
        let svg = render_svg(&doc).unwrap();
        let expected = 3 * 1188 + 2 * PAGE_GAP_PX;
        assert!(svg.contains(&format!("height=\"{}\"", expected)));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = Document::new();
        doc.text("Pump <A&B>", 10.0, 10.0, TextStyle::new(8.0, palette::BLUE));
        let svg = render_svg(&doc).unwrap();
        assert!(svg.contains("Pump &lt;A&amp;B&gt;"));
    }

    #[test]
    fn test_draws_every_primitive() {
        let mut doc = Document::new();
        doc.fill_rect(0.0, 0.0, 10.0, 10.0, palette::BLUE);
        doc.line((0.0, 0.0), (5.0, 5.0), palette::EMERALD, 1.0);
        doc.circle(5.0, 5.0, 0.6, palette::AMBER);
        doc.text("label", 5.0, 5.0, TextStyle::new(8.0, palette::RED).bold());

        let svg = render_svg(&doc).unwrap();
        assert!(svg.contains("<rect"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("label"));
    }
}
