use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::EquipmentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::Type,
        SortField::Flowrate,
        SortField::Pressure,
        SortField::Temperature,
    ];

    pub fn header(self) -> &'static str {
        match self {
            SortField::Name => "Equipment Name",
            SortField::Type => "Type",
            SortField::Flowrate => "Flowrate (m³/h)",
            SortField::Pressure => "Pressure (bar)",
            SortField::Temperature => "Temperature (°C)",
        }
    }

    /// Field for a 1-based column number
    pub fn from_column(column: usize) -> Option<Self> {
        column.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    fn compare(self, a: &EquipmentRecord, b: &EquipmentRecord) -> Ordering {
        match self {
            SortField::Name => a.equipment_name.cmp(&b.equipment_name),
            SortField::Type => a.equipment_type.cmp(&b.equipment_type),
            SortField::Flowrate => a.flowrate.total_cmp(&b.flowrate),
            SortField::Pressure => a.pressure.total_cmp(&b.pressure),
            SortField::Temperature => a.temperature.total_cmp(&b.temperature),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::Name => "name",
            SortField::Type => "type",
            SortField::Flowrate => "flowrate",
            SortField::Pressure => "pressure",
            SortField::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" | "equipment_name" => Ok(SortField::Name),
            "type" => Ok(SortField::Type),
            "flowrate" | "flow" => Ok(SortField::Flowrate),
            "pressure" => Ok(SortField::Pressure),
            "temperature" | "temp" => Ok(SortField::Temperature),
            other => Err(format!(
                "unknown sort field '{}' (expected name, type, flowrate, pressure or temperature)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "▲",
            SortOrder::Desc => "▼",
        }
    }
}

/// Column sort state for the equipment table (default: name ascending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl TableSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Header click: the active column flips direction, any other column starts ascending
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.order = self.order.toggled();
        } else {
            self.field = field;
            self.order = SortOrder::Asc;
        }
    }

    /// Stable sort; rows comparing equal keep their upload order in both directions
    pub fn apply<'a>(&self, rows: &'a [EquipmentRecord]) -> Vec<&'a EquipmentRecord> {
        let mut sorted: Vec<&EquipmentRecord> = rows.iter().collect();
        match self.order {
            SortOrder::Asc => sorted.sort_by(|a, b| self.field.compare(a, b)),
            SortOrder::Desc => sorted.sort_by(|a, b| self.field.compare(b, a)),
        }
        sorted
    }

    /// Arrow shown next to the active column's header
    pub fn indicator(&self, field: SortField) -> Option<&'static str> {
        (self.field == field).then(|| self.order.arrow())
    }
}

/// Numeric cell text: shortest round-trip form, so `10.0` shows as `10`
pub fn format_value(value: f64) -> String {
    value.to_string()
}
