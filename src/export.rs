//! CSV and JSON export of extracted records.

use std::path::Path;

use crate::extract::{BusinessRecord, RECORD_FIELDS};

/// File formats for record export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick a format from a file extension; anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }

    pub fn render(&self, records: &[BusinessRecord]) -> Result<String, serde_json::Error> {
        match self {
            Self::Csv => Ok(to_csv(records)),
            Self::Json => to_json(records),
        }
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Header row plus one row per record, columns in [`RECORD_FIELDS`] order.
pub fn to_csv(records: &[BusinessRecord]) -> String {
    let mut csv = RECORD_FIELDS.join(",");
    csv.push('\n');
    for record in records {
        let row: Vec<String> = record.columns().iter().map(|c| escape_csv(c)).collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// Pretty-printed JSON array with all six keys on every object.
pub fn to_json(records: &[BusinessRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> BusinessRecord {
        BusinessRecord {
            name: "Acme Plumbing, Inc.".to_string(),
            address: Some("123 Main St".to_string()),
            phone: Some("555-0100".to_string()),
            email: None,
            services: Some("Drains \"and\" pipes".to_string()),
            website_url: None,
        }
    }

    #[test]
    fn test_csv_quotes_when_needed() {
        let csv = to_csv(&[acme()]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("name,address,phone,email,services,website_url")
        );
        assert_eq!(
            lines.next(),
            Some(r#""Acme Plumbing, Inc.",123 Main St,555-0100,,"Drains ""and"" pipes","#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_json_keeps_nulls() {
        let json = to_json(&[acme()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["email"], serde_json::Value::Null);
        assert_eq!(value[0]["name"], "Acme Plumbing, Inc.");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Csv);
    }
}
