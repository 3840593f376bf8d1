use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Custom deserializer for timestamp that accepts both integers (ms) and RFC3339 strings
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => {
            // Assume it's a Unix timestamp in milliseconds
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        Value::String(s) => s
            .parse::<DateTime<Utc>>()
            .map_err(|e| Error::custom(format!("invalid RFC3339 timestamp: {}", e))),
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

/// Serialize as ISO-8601 with millisecond precision and a `Z` suffix
pub fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use indexmap::IndexMap;

    use crate::models::{DatasetEntry, SummaryStatistics};

    fn empty_summary_json() -> &'static str {
        r#"{
            "total_equipment_count": 0,
            "average_flowrate": 0.0,
            "average_pressure": 0.0,
            "average_temperature": 0.0,
            "distribution_by_type": {}
        }"#
    }

    #[test]
    fn test_dataset_entry_timestamp_integer() {
        let json = format!(
            r#"{{"id": 1762076480016, "filename": "plant.csv", "timestamp": 1762076480016, "summary": {}}}"#,
            empty_summary_json()
        );

        let entry: DatasetEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.filename, "plant.csv");

        let expected_ts = DateTime::from_timestamp_millis(1762076480016).unwrap();
        assert_eq!(entry.timestamp, expected_ts);
    }

    #[test]
    fn test_dataset_entry_timestamp_rfc3339() {
        let json = format!(
            r#"{{"id": 1, "filename": "plant.csv", "timestamp": "2025-11-02T09:41:20.016Z", "summary": {}}}"#,
            empty_summary_json()
        );

        let entry: DatasetEntry = serde_json::from_str(&json).unwrap();
        let expected_ts = DateTime::from_timestamp_millis(1762076480016).unwrap();
        assert_eq!(entry.timestamp, expected_ts);
    }

    #[test]
    fn test_dataset_entry_timestamp_rejects_bool() {
        let json = format!(
            r#"{{"id": 1, "filename": "plant.csv", "timestamp": true, "summary": {}}}"#,
            empty_summary_json()
        );

        assert!(serde_json::from_str::<DatasetEntry>(&json).is_err());
    }

    #[test]
    fn test_timestamp_serializes_as_iso_millis() {
        let entry = DatasetEntry {
            id: 1762076480016,
            filename: "plant.csv".to_string(),
            timestamp: DateTime::from_timestamp_millis(1762076480016).unwrap(),
            summary: SummaryStatistics {
                total_equipment_count: 0,
                average_flowrate: 0.0,
                average_pressure: 0.0,
                average_temperature: 0.0,
                distribution_by_type: IndexMap::new(),
            },
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""timestamp":"2025-11-02T09:41:20.016Z""#));
    }
}
