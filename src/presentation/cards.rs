use super::{Rgb, palette};
use crate::models::SummaryStatistics;

/// One headline metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    /// Upper-case label used in exported reports
    pub report_label: &'static str,
    /// ASCII-only value used in exported reports
    pub report_value: String,
    pub accent: Rgb,
}

/// Total count plus the three averages, in display order
pub fn metric_cards(summary: &SummaryStatistics) -> [MetricCard; 4] {
    [
        MetricCard {
            title: "Total Equipment",
            value: summary.total_equipment_count.to_string(),
            report_label: "TOTAL UNITS",
            report_value: summary.total_equipment_count.to_string(),
            accent: palette::BLUE,
        },
        MetricCard {
            title: "Avg Flowrate",
            value: format!("{:.1} m³/h", summary.average_flowrate),
            report_label: "AVG FLOWRATE",
            report_value: format!("{:.1} m3/h", summary.average_flowrate),
            accent: palette::EMERALD,
        },
        MetricCard {
            title: "Avg Pressure",
            value: format!("{:.1} bar", summary.average_pressure),
            report_label: "AVG PRESSURE",
            report_value: format!("{:.1} bar", summary.average_pressure),
            accent: palette::AMBER,
        },
        MetricCard {
            title: "Avg Temperature",
            value: format!("{:.1} °C", summary.average_temperature),
            report_label: "AVG TEMP",
            report_value: format!("{:.1} C", summary.average_temperature),
            accent: palette::RED,
        },
    ]
}
