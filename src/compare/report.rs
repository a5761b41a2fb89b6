//! Rendering of folder comparison tables

use super::{ComparisonEntry, ComparisonStats, FileStatus};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const COLUMNS: [&str; 8] = [
    "Archivo", "Estado", "PathV1", "PathV2", "FechaV1", "FechaV2", "SizeV1", "SizeV2",
];

/// One row of the comparison table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Relative path
    #[serde(rename = "Archivo")]
    pub file: String,
    #[serde(rename = "Estado")]
    pub status: FileStatus,
    #[serde(rename = "PathV1")]
    pub path_v1: Option<String>,
    #[serde(rename = "PathV2")]
    pub path_v2: Option<String>,
    /// Modification times as `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "FechaV1")]
    pub date_v1: Option<String>,
    #[serde(rename = "FechaV2")]
    pub date_v2: Option<String>,
    #[serde(rename = "SizeV1")]
    pub size_v1: u64,
    #[serde(rename = "SizeV2")]
    pub size_v2: u64,
}

impl From<&ComparisonEntry> for ReportRow {
    fn from(entry: &ComparisonEntry) -> Self {
        let format_date = |d: &Option<DateTime<Local>>| d.map(|d| d.format(DATE_FORMAT).to_string());
        Self {
            file: entry.relative_path.clone(),
            status: entry.status,
            path_v1: entry.path_v1.as_ref().map(|p| p.display().to_string()),
            path_v2: entry.path_v2.as_ref().map(|p| p.display().to_string()),
            date_v1: format_date(&entry.mtime_v1),
            date_v2: format_date(&entry.mtime_v2),
            size_v1: entry.size_v1,
            size_v2: entry.size_v2,
        }
    }
}

impl ReportRow {
    fn fields(&self) -> [String; 8] {
        [
            self.file.clone(),
            self.status.to_string(),
            self.path_v1.clone().unwrap_or_default(),
            self.path_v2.clone().unwrap_or_default(),
            self.date_v1.clone().unwrap_or_default(),
            self.date_v2.clone().unwrap_or_default(),
            self.size_v1.to_string(),
            self.size_v2.to_string(),
        ]
    }
}

/// Human-readable table with a status count footer
pub fn render_text(entries: &[ComparisonEntry]) -> String {
    let mut out = String::new();
    if entries.is_empty() {
        out.push_str("No files found in either version.\n");
        return out;
    }

    let width = entries
        .iter()
        .map(|e| e.relative_path.chars().count())
        .max()
        .unwrap_or(0)
        .max("Archivo".len());

    let _ = writeln!(
        out,
        "{:<9} {:<width$} {:>10} {:>10}",
        "Estado", "Archivo", "SizeV1", "SizeV2"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<9} {:<width$} {:>10} {:>10}",
            entry.status.to_string(),
            entry.relative_path,
            entry.size_v1,
            entry.size_v2
        );
    }

    let stats = ComparisonStats::from_entries(entries);
    let _ = writeln!(
        out,
        "\n{} files: {} new, {} removed, {} modified, {} unchanged",
        stats.total(),
        stats.new,
        stats.removed,
        stats.modified,
        stats.same
    );
    out
}

/// Pretty JSON array of report rows
pub fn render_json(entries: &[ComparisonEntry]) -> serde_json::Result<String> {
    let rows: Vec<ReportRow> = entries.iter().map(ReportRow::from).collect();
    serde_json::to_string_pretty(&rows)
}

/// CSV with a header row
pub fn render_csv(entries: &[ComparisonEntry]) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    for entry in entries {
        let fields = ReportRow::from(entry).fields();
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Quote a CSV field when it contains a delimiter, quote or line break
pub(crate) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn entries() -> Vec<ComparisonEntry> {
        let when = Local.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        vec![
            ComparisonEntry {
                relative_path: "nuevo.pdf".to_string(),
                status: FileStatus::New,
                path_v1: None,
                path_v2: Some(PathBuf::from("/v2/nuevo.pdf")),
                size_v1: 0,
                size_v2: 20,
                mtime_v1: None,
                mtime_v2: Some(when),
            },
            ComparisonEntry {
                relative_path: "planos/losa, nivel 1.pdf".to_string(),
                status: FileStatus::Modified,
                path_v1: Some(PathBuf::from("/v1/planos/losa, nivel 1.pdf")),
                path_v2: Some(PathBuf::from("/v2/planos/losa, nivel 1.pdf")),
                size_v1: 10,
                size_v2: 12,
                mtime_v1: Some(when),
                mtime_v2: Some(when),
            },
        ]
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let csv = render_csv(&entries());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Archivo,Estado,PathV1,PathV2,FechaV1,FechaV2,SizeV1,SizeV2"
        );
        assert_eq!(
            lines[1],
            "nuevo.pdf,NEW,,/v2/nuevo.pdf,,2024-01-15 09:30:00,0,20"
        );
        assert!(lines[2].starts_with("\"planos/losa, nivel 1.pdf\",MODIFIED,"));
    }

    #[test]
    fn test_json_uses_column_names() {
        let json = render_json(&entries()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["Archivo"], "nuevo.pdf");
        assert_eq!(value[0]["Estado"], "NEW");
        assert!(value[0]["PathV1"].is_null());
        assert_eq!(value[1]["SizeV2"], 12);
    }

    #[test]
    fn test_text_table() {
        let text = render_text(&entries());
        assert!(text.contains("NEW"));
        assert!(text.contains("planos/losa, nivel 1.pdf"));
        assert!(text.contains("2 files: 1 new, 0 removed, 1 modified, 0 unchanged"));
        assert!(render_text(&[]).contains("No files found"));
    }
}
