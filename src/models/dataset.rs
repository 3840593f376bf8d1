use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::equipment::SummaryStatistics;

/// One retained upload: metadata plus its summary (rows are stored separately)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// Creation time in epoch milliseconds, unique within a history
    pub id: i64,
    pub filename: String,
    #[serde(
        serialize_with = "crate::parsers::deserializers::serialize_timestamp",
        deserialize_with = "crate::parsers::deserializers::deserialize_timestamp"
    )]
    pub timestamp: DateTime<Utc>,
    pub summary: SummaryStatistics,
}
