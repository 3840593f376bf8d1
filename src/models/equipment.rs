use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One parsed CSV row describing a piece of process equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: u64,
    pub equipment_name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Aggregate metrics computed once per dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_equipment_count: usize,
    pub average_flowrate: f64,
    pub average_pressure: f64,
    pub average_temperature: f64,
    /// Count per type label, in order of first occurrence
    pub distribution_by_type: IndexMap<String, usize>,
}

impl SummaryStatistics {
    /// Largest per-type count, or 0 for an empty distribution
    pub fn max_type_count(&self) -> usize {
        self.distribution_by_type.values().copied().max().unwrap_or(0)
    }
}
