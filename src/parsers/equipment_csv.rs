use std::fmt;

use tracing::{debug, warn};

use crate::models::EquipmentRecord;

/// Substituted for a missing name or type field
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Positional CSV columns: `name,type,flowrate,pressure,temperature`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Column::Name => "name",
            Column::Type => "type",
            Column::Flowrate => "flowrate",
            Column::Pressure => "pressure",
            Column::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    Missing,
    NotNumeric,
}

/// A field that was replaced by its default while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    /// 1-based line number in the source text
    pub line: usize,
    pub column: Column,
    pub raw: String,
    pub kind: WarningKind,
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::Missing => write!(f, "line {}: missing {}", self.line, self.column),
            WarningKind::NotNumeric => {
                write!(f, "line {}: {} {:?} is not a number", self.line, self.column, self.raw)
            }
        }
    }
}

/// Rows parsed from one CSV document plus any defaulted fields
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub rows: Vec<EquipmentRecord>,
    pub warnings: Vec<RowWarning>,
}

/// Parse equipment CSV text into records
///
/// The first non-blank line is a header and is skipped without inspection. Columns are
/// positional and split on bare commas (no quoting). Record ids come from a counter local to
/// this call, so they are `1..=n` regardless of wall-clock time.
pub fn parse_equipment_csv(text: &str) -> ParsedCsv {
    let mut parsed = ParsedCsv::default();
    let mut next_id: u64 = 1;

    let mut lines =
        text.split('\n').enumerate().filter(|(_, line)| !line.trim().is_empty());

    // Header is position-only; nothing to validate
    if let Some((_, header)) = lines.next() {
        debug!(header = header.trim(), "Skipping CSV header");
    }

    for (idx, line) in lines {
        let line_num = idx + 1;
        let values: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |i: usize| values.get(i).copied().unwrap_or("");

        let mut row_warnings = Vec::new();
        let equipment_name = parse_label(field(0), line_num, Column::Name, &mut row_warnings);
        let equipment_type = parse_label(field(1), line_num, Column::Type, &mut row_warnings);
        let flowrate = parse_number(field(2), line_num, Column::Flowrate, &mut row_warnings);
        let pressure = parse_number(field(3), line_num, Column::Pressure, &mut row_warnings);
        let temperature = parse_number(field(4), line_num, Column::Temperature, &mut row_warnings);

        for warning in &row_warnings {
            warn!("Defaulted field in CSV: {}", warning);
        }
        parsed.warnings.extend(row_warnings);

        parsed.rows.push(EquipmentRecord {
            id: next_id,
            equipment_name,
            equipment_type,
            flowrate,
            pressure,
            temperature,
        });
        next_id += 1;
    }

    if !parsed.warnings.is_empty() {
        debug!(
            rows = parsed.rows.len(),
            warnings = parsed.warnings.len(),
            "Parsed CSV with defaulted fields"
        );
    }

    parsed
}

fn parse_label(raw: &str, line: usize, column: Column, warnings: &mut Vec<RowWarning>) -> String {
    if raw.is_empty() {
        warnings.push(RowWarning {
            line,
            column,
            raw: String::new(),
            kind: WarningKind::Missing,
        });
        UNKNOWN_LABEL.to_string()
    } else {
        raw.to_string()
    }
}

fn parse_number(raw: &str, line: usize, column: Column, warnings: &mut Vec<RowWarning>) -> f64 {
    if raw.is_empty() {
        warnings.push(RowWarning {
            line,
            column,
            raw: String::new(),
            kind: WarningKind::Missing,
        });
        return 0.0;
    }

    match leading_number(raw) {
        Some(value) => value,
        None => {
            warnings.push(RowWarning {
                line,
                column,
                raw: raw.to_string(),
                kind: WarningKind::NotNumeric,
            });
            0.0
        }
    }
}

/// Longest numeric prefix of `raw`, so `12.5 m3/h` reads as 12.5
///
/// Accepts an optional sign, digits with at most one decimal point and an optional exponent.
/// A prefix without digits, or one that overflows to infinity, yields `None`.
fn leading_number(raw: &str) -> Option<f64> {
    let bytes = raw.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    let value: f64 = raw[..end].parse().ok()?;
    if end < raw.len() {
        debug!(raw, value, "Read leading number from field with trailing text");
    }
    value.is_finite().then_some(value)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
