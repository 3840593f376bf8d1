//! Report layout: dataset in, [`Document`] out
//!
//! Page 1 carries the header band, metric cards, type distribution bars and the trend plot.
//! Bars shrink to fit up to [`FIRST_PAGE_BARS`] types on page 1; further types continue on
//! extra pages before the equipment table, which flows onto as many pages as it needs.

use super::document::{Align, Document, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, TableSpec, TextStyle};
use super::{ReportFormat, ReportRequest};
use crate::presentation::{
    DistributionBar, Rgb, distribution_bars, format_value, metric_cards, normalize_series,
    palette, trend_chart,
};
use crate::utils::terminal::{sanitize_cell, truncate_display};

const WHITE: Rgb = Rgb(255, 255, 255);
const HEADING: Rgb = Rgb(31, 41, 55);
const MUTED: Rgb = Rgb(107, 114, 128);
const CARD_LABEL: Rgb = Rgb(156, 163, 175);
const CARD_FILL: Rgb = Rgb(248, 250, 252);
const CARD_BORDER: Rgb = Rgb(241, 245, 249);
const BAR_TRACK: Rgb = Rgb(243, 244, 246);
const AXIS: Rgb = Rgb(229, 231, 235);
const FOOTER: Rgb = Rgb(200, 200, 200);

const MARGIN: f64 = 14.0;

const CARDS_Y: f64 = 50.0;
const CARD_W: f64 = 44.0;
const CARD_H: f64 = 22.0;
const CARD_GUTTER: f64 = 4.5;

const DIST_TITLE_Y: f64 = 88.0;
const DIST_TOP: f64 = 98.0;
/// Lower edge of the distribution band on page 1, clear of the trend heading
const DIST_BOTTOM: f64 = 155.0;
const DIST_ROW: f64 = 8.0;
const DIST_FONT_PT: f64 = 8.0;
const BAR_X: f64 = 50.0;
const BAR_MAX_W: f64 = 100.0;
/// Bar height as a share of the row pitch
const BAR_FILL: f64 = 0.625;
/// Bars drawn on page 1; each row is then `(DIST_BOTTOM - DIST_TOP) / 12` = 4.75 mm
pub const FIRST_PAGE_BARS: usize = 12;
const OVERFLOW_TOP: f64 = 25.0;
/// Full-pitch rows on a continuation page, above the footer
const OVERFLOW_ROWS: usize = 31;

const TREND_TITLE_Y: f64 = 160.0;

/// Plot rectangle for the trend chart, in page millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

pub const TREND_AREA: PlotArea = PlotArea { x: 20.0, y: 175.0, w: 175.0, h: 45.0 };

pub fn report_filename(dataset_id: i64, format: ReportFormat) -> String {
    format!("CHEMVIS_Report_{}.{}", dataset_id, format.extension())
}

/// Lay out every page of the report
pub fn layout_report(request: &ReportRequest) -> Document {
    let mut doc = Document::new();
    let bars = distribution_bars(&request.entry.summary);
    let (first_page, overflow) = bars.split_at(bars.len().min(FIRST_PAGE_BARS));

    draw_header(&mut doc, request);
    draw_cards(&mut doc, request);
    draw_distribution(&mut doc, first_page);
    draw_trends(&mut doc, request);
    draw_distribution_overflow(&mut doc, overflow);

    doc.add_page();
    draw_equipment_log(&mut doc, request);

    draw_footers(&mut doc);
    doc
}

/// Map a series onto the plot area, one point per value
///
/// Points are spread evenly across the width; a single value sits on the left edge.
pub fn plot_points(data: &[f64], area: PlotArea) -> Vec<(f64, f64)> {
    let step = area.w / data.len().saturating_sub(1).max(1) as f64;
    normalize_series(data)
        .into_iter()
        .enumerate()
        .map(|(i, fraction)| {
            let x = area.x + i as f64 * step;
            let y = area.y + area.h - fraction.clamp(0.0, 1.0) * area.h;
            (x, y)
        })
        .collect()
}

fn draw_header(doc: &mut Document, request: &ReportRequest) {
    doc.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, 40.0, palette::BLUE);
    doc.text("CHEM-VIS ANALYSIS REPORT", MARGIN, 22.0, TextStyle::new(22.0, WHITE).bold());

    let filename = sanitize_cell(&request.entry.filename).to_uppercase();
    doc.text(
        format!("SESSION ID: #{} | FILENAME: {}", request.entry.id, filename),
        MARGIN,
        30.0,
        TextStyle::new(9.0, WHITE),
    );

    let operator = request
        .operator
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| sanitize_cell(name).to_uppercase())
        .unwrap_or_else(|| "GUEST".to_string());
    doc.text(
        format!("OPERATOR: {}", operator),
        PAGE_WIDTH_MM - MARGIN,
        22.0,
        TextStyle::new(9.0, WHITE).align(Align::Right),
    );
}

fn draw_cards(doc: &mut Document, request: &ReportRequest) {
    for (i, card) in metric_cards(&request.entry.summary).iter().enumerate() {
        let x = MARGIN + i as f64 * (CARD_W + CARD_GUTTER);
        doc.rect(x, CARDS_Y, CARD_W, CARD_H, Some(CARD_FILL), Some(CARD_BORDER));
        let label_style = TextStyle::new(6.5, CARD_LABEL).bold();
        doc.text(card.report_label, x + 4.0, CARDS_Y + 7.0, label_style);
        doc.text(
            card.report_value.clone(),
            x + 4.0,
            CARDS_Y + 16.0,
            TextStyle::new(10.0, card.accent).bold(),
        );
    }
}

fn draw_distribution(doc: &mut Document, bars: &[DistributionBar]) {
    doc.text("Type Distribution", MARGIN, DIST_TITLE_Y, TextStyle::new(12.0, HEADING).bold());

    let pitch = ((DIST_BOTTOM - DIST_TOP) / bars.len().max(1) as f64).min(DIST_ROW);
    for (i, bar) in bars.iter().enumerate() {
        draw_bar_row(doc, bar, DIST_TOP + i as f64 * pitch, pitch);
    }
}

/// Types beyond the first page, on as many continuation pages as they need
fn draw_distribution_overflow(doc: &mut Document, bars: &[DistributionBar]) {
    for chunk in bars.chunks(OVERFLOW_ROWS) {
        doc.add_page();
        doc.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, 15.0, palette::BLUE);
        let heading = TextStyle::new(10.0, WHITE).bold();
        doc.text("TYPE DISTRIBUTION (CONTINUED)", MARGIN, 10.0, heading);

        for (i, bar) in chunk.iter().enumerate() {
            draw_bar_row(doc, bar, OVERFLOW_TOP + i as f64 * DIST_ROW, DIST_ROW);
        }
    }
}

/// Label, track, bar and count for one type; text shrinks with the pitch
fn draw_bar_row(doc: &mut Document, bar: &DistributionBar, y: f64, pitch: f64) {
    let bar_h = pitch * BAR_FILL;
    let baseline = y + bar_h * 0.8;
    let font_pt = (DIST_FONT_PT * pitch / DIST_ROW).max(6.5);
    let width = bar.fraction * BAR_MAX_W;
    let label = sanitize_cell(&bar.label);

    doc.text(truncate_display(&label, 18), MARGIN, baseline, TextStyle::new(font_pt, MUTED));
    doc.fill_rect(BAR_X, y, BAR_MAX_W, bar_h, BAR_TRACK);
    if width > 0.0 {
        doc.fill_rect(BAR_X, y, width, bar_h, palette::BLUE);
    }
    doc.text(
        bar.count.to_string(),
        BAR_X + width + 3.0,
        baseline,
        TextStyle::new(font_pt, palette::BLUE).bold(),
    );
}

fn draw_trends(doc: &mut Document, request: &ReportRequest) {
    doc.text("Process Trends", MARGIN, TREND_TITLE_Y, TextStyle::new(12.0, HEADING).bold());

    let area = TREND_AREA;
    doc.line((area.x, area.y), (area.x, area.y + area.h), AXIS, 0.2);
    doc.line((area.x, area.y + area.h), (area.x + area.w, area.y + area.h), AXIS, 0.2);

    let chart = trend_chart(&request.rows);
    for dataset in &chart.datasets {
        let color = dataset.color_at(0);
        let points = plot_points(&dataset.data, area);
        for pair in points.windows(2) {
            doc.line(pair[0], pair[1], color, 1.0);
        }
        for &(x, y) in &points {
            doc.circle(x, y, 0.6, color);
        }
    }

    let legend = TextStyle::new(7.0, MUTED);
    doc.fill_rect(140.0, TREND_TITLE_Y, 3.0, 3.0, palette::BLUE);
    doc.text("Flowrate (m3/h)", 145.0, TREND_TITLE_Y + 3.0, legend);
    doc.fill_rect(168.0, TREND_TITLE_Y, 3.0, 3.0, palette::EMERALD);
    doc.text("Pressure (bar)", 173.0, TREND_TITLE_Y + 3.0, legend);
}

fn draw_equipment_log(doc: &mut Document, request: &ReportRequest) {
    doc.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, 15.0, palette::BLUE);
    doc.text("DETAILED EQUIPMENT LOG", MARGIN, 10.0, TextStyle::new(10.0, WHITE).bold());

    let head = ["Equipment Name", "Type", "Flowrate (m³/h)", "Pressure (bar)", "Temp (°C)"];
    let body = request
        .rows
        .iter()
        .map(|row| {
            vec![
                sanitize_cell(&row.equipment_name).into_owned(),
                sanitize_cell(&row.equipment_type).into_owned(),
                format_value(row.flowrate),
                format_value(row.pressure),
                format_value(row.temperature),
            ]
        })
        .collect();

    doc.auto_table(&TableSpec {
        head: head.iter().map(|h| h.to_string()).collect(),
        body,
        start_y: 20.0,
        margin_left: MARGIN,
        margin_right: MARGIN,
        margin_vertical: MARGIN,
        head_fill: palette::BLUE,
        head_text: WHITE,
        body_text: Rgb(80, 80, 80),
        stripe_fill: Rgb(245, 245, 245),
        head_font_pt: 9.0,
        body_font_pt: 8.0,
        cell_padding: 2.5,
    });
}

fn draw_footers(doc: &mut Document) {
    let total = doc.page_count();
    let style = TextStyle::new(8.0, FOOTER).align(Align::Center);
    for index in 0..total {
        doc.set_page(index);
        doc.text(
            format!("Page {} of {}", index + 1, total),
            PAGE_WIDTH_MM / 2.0,
            PAGE_HEIGHT_MM - 9.0,
            style,
        );
    }
}
