//! Display projections shared by the dashboard, the CLI and the report
//!
//! Everything here is a pure function of a [`SummaryStatistics`](crate::models::SummaryStatistics)
//! or a row slice; no module keeps state besides the table's sort selection.

pub mod cards;
pub mod charts;
pub mod table;

pub use cards::{MetricCard, metric_cards};
pub use charts::{
    ChartData, ChartDataset, DistributionBar, distribution_bars, distribution_chart,
    normalize_series, trend_chart,
};
pub use table::{SortField, SortOrder, TableSort, format_value};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub mod palette {
    use super::Rgb;

    pub const BLUE: Rgb = Rgb(59, 130, 246);
    pub const EMERALD: Rgb = Rgb(16, 185, 129);
    pub const AMBER: Rgb = Rgb(245, 158, 11);
    pub const RED: Rgb = Rgb(239, 68, 68);
    pub const VIOLET: Rgb = Rgb(139, 92, 246);

    /// Cycled across distribution categories
    pub const CATEGORY: [Rgb; 5] = [BLUE, EMERALD, AMBER, RED, VIOLET];
}
