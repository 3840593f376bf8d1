use indexmap::IndexMap;

use crate::models::{EquipmentRecord, SummaryStatistics};

/// Compute summary statistics for a list of records
///
/// Averages over an empty list are reported as `0.0` rather than NaN. Uploads with no rows are
/// rejected earlier by [`crate::ingest`], so this only matters for direct library callers.
pub fn summarize(rows: &[EquipmentRecord]) -> SummaryStatistics {
    let mut distribution_by_type: IndexMap<String, usize> = IndexMap::new();
    for row in rows {
        *distribution_by_type.entry(row.equipment_type.clone()).or_insert(0) += 1;
    }

    SummaryStatistics {
        total_equipment_count: rows.len(),
        average_flowrate: mean(rows.iter().map(|r| r.flowrate), rows.len()),
        average_pressure: mean(rows.iter().map(|r| r.pressure), rows.len()),
        average_temperature: mean(rows.iter().map(|r| r.temperature), rows.len()),
        distribution_by_type,
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_equipment_csv;

    fn record(id: u64, equipment_type: &str, flowrate: f64) -> EquipmentRecord {
        EquipmentRecord {
            id,
            equipment_name: format!("Unit-{}", id),
            equipment_type: equipment_type.to_string(),
            flowrate,
            pressure: flowrate / 2.0,
            temperature: flowrate * 3.0,
        }
    }

    #[test]
    fn test_sample_scenario() {
        let text = "name,type,flowrate,pressure,temperature\n\
                    Pump-1,Pump,12.5,3.2,80\n\
                    Pump-2,Pump,15.0,3.5,82\n\
                    Valve-1,Valve,0,1.1,25";
        let rows = parse_equipment_csv(text).rows;
        let summary = summarize(&rows);

        assert_eq!(summary.total_equipment_count, 3);
        assert!((summary.average_flowrate - 9.1667).abs() < 1e-4);
        assert!((summary.average_pressure - 2.6).abs() < 1e-9);
        assert!((summary.average_temperature - 62.3333).abs() < 1e-4);

        let dist: Vec<(&str, usize)> =
            summary.distribution_by_type.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(dist, vec![("Pump", 2), ("Valve", 1)]);
    }

    #[test]
    fn test_empty_rows_have_zero_averages() {
        let summary = summarize(&[]);

        assert_eq!(summary.total_equipment_count, 0);
        assert_eq!(summary.average_flowrate, 0.0);
        assert_eq!(summary.average_pressure, 0.0);
        assert_eq!(summary.average_temperature, 0.0);
        assert!(summary.distribution_by_type.is_empty());
        assert_eq!(summary.max_type_count(), 0);
    }

    #[test]
    fn test_averages_match_arithmetic_mean() {
        let rows: Vec<EquipmentRecord> =
            (1..=17).map(|i| record(i, "Pump", i as f64 * 1.37)).collect();
        let summary = summarize(&rows);

        let n = rows.len() as f64;
        let flow: f64 = rows.iter().map(|r| r.flowrate).sum::<f64>() / n;
        let press: f64 = rows.iter().map(|r| r.pressure).sum::<f64>() / n;
        let temp: f64 = rows.iter().map(|r| r.temperature).sum::<f64>() / n;

        assert!((summary.average_flowrate - flow).abs() < 1e-9);
        assert!((summary.average_pressure - press).abs() < 1e-9);
        assert!((summary.average_temperature - temp).abs() < 1e-9);
    }

    #[test]
    fn test_distribution_sums_to_count() {
        let types = ["Pump", "Valve", "Reactor", "Pump", "Heat Exchanger", "Valve", "Pump"];
        let rows: Vec<EquipmentRecord> =
            types.iter().enumerate().map(|(i, t)| record(i as u64, t, 1.0)).collect();
        let summary = summarize(&rows);

        let total: usize = summary.distribution_by_type.values().sum();
        assert_eq!(total, summary.total_equipment_count);
        assert_eq!(summary.max_type_count(), 3);
    }

    #[test]
    fn test_distribution_keeps_first_occurrence_order() {
        let rows = vec![
            record(1, "Valve", 1.0),
            record(2, "Pump", 1.0),
            record(3, "Valve", 1.0),
            record(4, "Reactor", 1.0),
        ];
        let summary = summarize(&rows);

        let keys: Vec<&str> = summary.distribution_by_type.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Valve", "Pump", "Reactor"]);
    }

    #[test]
    fn test_distribution_order_survives_json() {
        let rows = vec![record(1, "Zeta", 1.0), record(2, "Alpha", 1.0)];
        let summary = summarize(&rows);

        let json = serde_json::to_string(&summary).unwrap();
        let restored: SummaryStatistics = serde_json::from_str(&json).unwrap();

        let keys: Vec<&str> = restored.distribution_by_type.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);
    }
}
