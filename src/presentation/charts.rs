use super::{Rgb, palette};
use crate::models::{EquipmentRecord, SummaryStatistics};

/// Labelled series, one value per label
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    /// One color per point for categorical charts, or a single series color
    pub colors: Vec<Rgb>,
}

impl ChartDataset {
    pub fn color_at(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            return palette::BLUE;
        }
        self.colors[index % self.colors.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// A type-distribution bar; `fraction` is the bar length relative to the largest count
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionBar {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
}

pub fn distribution_chart(summary: &SummaryStatistics) -> ChartData {
    let labels: Vec<String> = summary.distribution_by_type.keys().cloned().collect();
    let data = summary.distribution_by_type.values().map(|&count| count as f64).collect();
    let colors =
        (0..labels.len()).map(|i| palette::CATEGORY[i % palette::CATEGORY.len()]).collect();

    ChartData {
        labels,
        datasets: vec![ChartDataset {
            label: "Equipment Type Distribution".to_string(),
            data,
            colors,
        }],
    }
}

/// Bars in first-occurrence order; a zero maximum yields zero-length bars
pub fn distribution_bars(summary: &SummaryStatistics) -> Vec<DistributionBar> {
    let max = summary.max_type_count();
    summary
        .distribution_by_type
        .iter()
        .map(|(label, &count)| DistributionBar {
            label: label.clone(),
            count,
            fraction: if max == 0 { 0.0 } else { count as f64 / max as f64 },
        })
        .collect()
}

/// Flowrate and pressure per row, labelled by equipment name (or `Unit n` when blank)
pub fn trend_chart(rows: &[EquipmentRecord]) -> ChartData {
    let labels = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            if row.equipment_name.is_empty() {
                format!("Unit {}", i + 1)
            } else {
                row.equipment_name.clone()
            }
        })
        .collect();

    ChartData {
        labels,
        datasets: vec![
            ChartDataset {
                label: "Flowrate (m³/h)".to_string(),
                data: rows.iter().map(|r| r.flowrate).collect(),
                colors: vec![palette::BLUE],
            },
            ChartDataset {
                label: "Pressure (bar)".to_string(),
                data: rows.iter().map(|r| r.pressure).collect(),
                colors: vec![palette::EMERALD],
            },
        ],
    }
}

/// Scale a series by its own maximum, floored at 1 so all-zero or sub-unit data stays finite
pub fn normalize_series(data: &[f64]) -> Vec<f64> {
    let max = data.iter().copied().fold(1.0_f64, f64::max);
    data.iter().map(|value| value / max).collect()
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    fn summary(dist: &[(&str, usize)]) -> SummaryStatistics {
        let distribution_by_type: IndexMap<String, usize> =
            dist.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        SummaryStatistics {
            total_equipment_count: distribution_by_type.values().sum(),
            average_flowrate: 0.0,
            average_pressure: 0.0,
            average_temperature: 0.0,
            distribution_by_type,
        }
    }

    fn row(name: &str, flowrate: f64, pressure: f64) -> EquipmentRecord {
        EquipmentRecord {
            id: 1,
            equipment_name: name.to_string(),
            equipment_type: "Pump".to_string(),
            flowrate,
            pressure,
            temperature: 20.0,
        }
    }

    #[test]
    fn test_distribution_bars_relative_to_max() {
        let bars = distribution_bars(&summary(&[("Pump", 2), ("Valve", 1)]));
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Pump");
        assert_eq!(bars[0].fraction, 1.0);
        assert_eq!(bars[1].fraction, 0.5);
    }

    #[test]
    fn test_distribution_bars_empty() {
        assert!(distribution_bars(&summary(&[])).is_empty());
    }

    #[test]
    fn test_distribution_bars_zero_counts() {
        let bars = distribution_bars(&summary(&[("Pump", 0)]));
        assert_eq!(bars[0].fraction, 0.0);
    }

    #[test]
    fn test_distribution_chart_keeps_order_and_cycles_colors() {
        let chart = distribution_chart(&summary(&[
            ("Valve", 1),
            ("Pump", 3),
            ("Reactor", 1),
            ("Mixer", 1),
            ("Tank", 1),
            ("Column", 1),
        ]));
        assert_eq!(chart.labels[0], "Valve");
        assert_eq!(chart.datasets[0].data[1], 3.0);
        assert_eq!(chart.datasets[0].color_at(5), chart.datasets[0].color_at(0));
    }

    #[test]
    fn test_trend_labels_fall_back_to_unit_index() {
        let chart = trend_chart(&[row("P-1", 10.0, 5.0), row("", 12.0, 6.0)]);
        assert_eq!(chart.labels, ["P-1", "Unit 2"]);
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].data, [10.0, 12.0]);
        assert_eq!(chart.datasets[1].data, [5.0, 6.0]);
    }

    #[test]
    fn test_normalize_series() {
        assert_eq!(normalize_series(&[5.0, 10.0]), [0.5, 1.0]);
        assert_eq!(normalize_series(&[0.0, 0.0]), [0.0, 0.0]);
        assert_eq!(normalize_series(&[0.5]), [0.5]);
        assert!(normalize_series(&[]).is_empty());
    }
}
