use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::FlowError;
use crate::models::{DaySnapshot, Settings};

use super::flow::{compute_positions, PositionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unsupported export format: {}", other)),
        }
    }
}

/// Writes the day's computed layout into `export_dir` and returns the file path.
pub fn export_layout(
    snapshot: &DaySnapshot,
    settings: &Settings,
    format: ExportFormat,
    export_dir: &Path,
) -> Result<String, String> {
    let records = compute_positions(snapshot, settings)?;

    std::fs::create_dir_all(export_dir).map_err(|e| e.to_string())?;
    let stem = format!(
        "patternflow_{}_{}",
        snapshot.date.format("%Y%m%d"),
        chrono::Utc::now().format("%H%M%S%3f")
    );
    let export_path = unique_export_path(export_dir, &stem, format.extension());

    match format {
        ExportFormat::Json => {
            let export = serde_json::json!({
                "version": settings.version,
                "exported_at": chrono::Utc::now().to_rfc3339(),
                "date": snapshot.date,
                "canvas": settings.canvas_size(),
                "positions": records,
            });
            let content = serde_json::to_string_pretty(&export).map_err(|e| e.to_string())?;
            std::fs::write(&export_path, content).map_err(|e| e.to_string())?;
        }
        ExportFormat::Csv => {
            write_csv(&export_path, &records).map_err(|e| e.to_string())?;
        }
    }

    log::info!("[Export] wrote {} positions to {}", records.len(), export_path.display());
    Ok(export_path.to_string_lossy().to_string())
}

/// `<stem>.<ext>`, or `<stem>-N.<ext>` for the first N that is not taken.
fn unique_export_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let mut path = dir.join(format!("{}.{}", stem, extension));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{}-{}.{}", stem, n, extension));
        n += 1;
    }
    path
}

fn write_csv(path: &Path, records: &[PositionRecord]) -> Result<(), FlowError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| FlowError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cascade, Pattern, PatternCategory};
    use chrono::{NaiveDate, Utc};

    fn snapshot() -> DaySnapshot {
        let a = Pattern::new("Crowded bus", PatternCategory::Sensory, 8, Utc::now());
        let b = Pattern::new("Headache", PatternCategory::PhysicalSleep, 5, Utc::now());
        DaySnapshot {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            cascades: vec![Cascade::new(a.id, b.id, 0.9)],
            patterns: vec![a, b],
        }
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_layout(&snapshot(), &Settings::default(), ExportFormat::Csv, dir.path()).unwrap();
        assert!(path.ends_with(".csv"));

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("pattern_id,pattern_type,category,column,x,y"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn json_export_lists_positions() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_layout(&snapshot(), &Settings::default(), ExportFormat::Json, dir.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["date"], "2026-03-14");
        assert_eq!(value["positions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn back_to_back_exports_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let first = export_layout(&snapshot(), &Settings::default(), ExportFormat::Json, dir.path()).unwrap();
        let second = export_layout(&snapshot(), &Settings::default(), ExportFormat::Json, dir.path()).unwrap();
        assert_ne!(first, second);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn taken_names_get_a_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("patternflow_x.csv"), "").unwrap();
        std::fs::write(dir.path().join("patternflow_x-1.csv"), "").unwrap();
        assert_eq!(unique_export_path(dir.path(), "patternflow_x", "csv"), dir.path().join("patternflow_x-2.csv"));
    }
}
