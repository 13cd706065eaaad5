//! JSON and CSV export.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::event::AuditEvent;

/// CSV column order.
pub const CSV_COLUMNS: [&str; 14] = [
    "id",
    "timestamp",
    "userId",
    "userEmail",
    "userRole",
    "action",
    "resource",
    "resourceId",
    "category",
    "severity",
    "outcome",
    "details",
    "ipAddress",
    "userAgent",
];

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unsupported export format: {other}")),
        }
    }
}

/// Serialize `events` in the given format.
pub fn export(events: &[AuditEvent], format: ExportFormat) -> Result<String, AuditError> {
    match format {
        ExportFormat::Json => to_json(events),
        ExportFormat::Csv => to_csv(events),
    }
}

/// Pretty-printed JSON array.
pub fn to_json(events: &[AuditEvent]) -> Result<String, AuditError> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// Header row plus one row per event, every field double-quoted.
pub fn to_csv(events: &[AuditEvent]) -> Result<String, AuditError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS).map_err(csv_error)?;

    for event in events {
        let details = serde_json::to_string(&event.details)?;
        let timestamp = event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        let row: [&str; 14] = [
            event.id.as_str(),
            &timestamp,
            &event.user_id,
            event.user_email.as_deref().unwrap_or(""),
            event.user_role.as_deref().unwrap_or(""),
            &event.action,
            &event.resource,
            event.resource_id.as_deref().unwrap_or(""),
            event.category.as_str(),
            event.severity.as_str(),
            event.outcome.as_str(),
            &details,
            event.ip_address.as_deref().unwrap_or(""),
            event.user_agent.as_deref().unwrap_or(""),
        ];
        writer.write_record(row).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AuditError::ExportFailed(e.error().to_string()))?;
    let mut out = String::from_utf8(bytes).map_err(|e| AuditError::ExportFailed(e.to_string()))?;
    // Rows are separated, not terminated
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

fn csv_error(e: csv::Error) -> AuditError {
    AuditError::ExportFailed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventCategory, Severity};
    use serde_json::json;

    fn sample() -> AuditEvent {
        AuditEvent::builder("create", "cattle")
            .user_id("u1")
            .user_email(Some("ops@saubhagya.example".into()))
            .resource_id("cow-7")
            .category(EventCategory::DataModification)
            .severity(Severity::Medium)
            .detail("name", json!("Gauri"))
            .user_agent(Some("Mozilla/5.0 (X11; Linux x86_64)".into()))
            .build()
    }

    #[test]
    fn test_csv_header_and_row() {
        let event = sample();
        let csv = to_csv(std::slice::from_ref(&event)).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\"id\",\"timestamp\",\"userId\""));
        assert!(lines[0].ends_with("\"ipAddress\",\"userAgent\""));
        assert!(lines[1].starts_with(&format!("\"{}\",", event.id)));
        assert!(lines[1].contains("\"data_modification\",\"medium\",\"success\""));
        assert!(lines[1].contains("\"cow-7\""));
        assert!(lines[1].contains(&event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)));
    }

    #[test]
    fn test_csv_escapes_embedded_quotes() {
        let event = sample();
        let csv = to_csv(&[event]).unwrap();
        // {"name":"Gauri"} with quotes doubled
        assert!(csv.contains("\"{\"\"name\"\":\"\"Gauri\"\"}\""));
    }

    #[test]
    fn test_csv_empty_has_header_only() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_csv_quotes_empty_fields_and_commas() {
        let event = AuditEvent::builder("update", "cattle, herd").build();
        let csv = to_csv(&[event]).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert!(row.contains(",\"cattle, herd\","));
        // userEmail and userRole are absent
        assert!(row.contains(",\"\",\"\","));
        assert_eq!(row.matches("\",\"").count(), 13);
    }

    #[test]
    fn test_json_export_is_pretty_array() {
        let event = sample();
        let json = to_json(std::slice::from_ref(&event)).unwrap();
        assert!(json.starts_with("[\n"));

        let parsed: Vec<AuditEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, event.id);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
