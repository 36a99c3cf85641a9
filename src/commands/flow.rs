use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{DaySnapshot, Settings};
use crate::services::flow_model::FlowModel;
use crate::services::layout_engine::assign_columns;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRecord {
    pub pattern_id: Uuid,
    pub pattern_type: String,
    pub category: String,
    pub column: usize,
    pub x: f64,
    pub y: f64,
}

pub fn load_snapshot(path: &Path) -> Result<DaySnapshot, String> {
    crate::services::snapshot_watcher::load_snapshot(path).map_err(|e| e.to_string())
}

pub fn build_model(snapshot: &DaySnapshot, settings: &Settings) -> Result<FlowModel, String> {
    let mut model = FlowModel::new(settings.clone(), settings.canvas_size()).map_err(|e| e.to_string())?;
    model.refresh(snapshot.patterns.clone(), snapshot.cascades.clone());
    Ok(model)
}

pub fn render_flow(snapshot: &DaySnapshot, settings: &Settings) -> Result<String, String> {
    let model = build_model(snapshot, settings)?;
    Ok(model.render_svg())
}

/// Positions in column order, top to bottom within each column.
pub fn compute_positions(snapshot: &DaySnapshot, settings: &Settings) -> Result<Vec<PositionRecord>, String> {
    let model = build_model(snapshot, settings)?;
    let positions = model.positions();
    let columns = assign_columns(&snapshot.patterns, &snapshot.cascades);

    let mut records = Vec::with_capacity(positions.len());
    for (column, ids) in columns.iter().enumerate() {
        for id in ids {
            let Some(pattern) = snapshot.patterns.iter().find(|p| p.id == *id) else {
                continue;
            };
            let Some(point) = positions.get(id) else {
                continue;
            };
            records.push(PositionRecord {
                pattern_id: *id,
                pattern_type: pattern.pattern_type.clone(),
                category: pattern.category.to_string(),
                column,
                x: point.x,
                y: point.y,
            });
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cascade, Pattern, PatternCategory};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn snapshot() -> DaySnapshot {
        let a = Pattern::new(
            "Skipped breakfast",
            PatternCategory::PhysicalSleep,
            4,
            Utc.with_ymd_and_hms(2026, 3, 14, 7, 30, 0).unwrap(),
        );
        let b = Pattern::new(
            "Irritability",
            PatternCategory::EnergyRegulation,
            6,
            Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap(),
        );
        let cascades = vec![Cascade::new(a.id, b.id, 0.65)];
        DaySnapshot {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            patterns: vec![b, a],
            cascades,
        }
    }

    #[test]
    fn positions_are_listed_by_column() {
        let records = compute_positions(&snapshot(), &Settings::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pattern_type, "Skipped breakfast");
        assert_eq!(records[0].column, 0);
        assert_eq!(records[1].column, 1);
        assert!(records[0].x < records[1].x);
    }

    #[test]
    fn invalid_settings_surface_as_error() {
        let mut settings = Settings::default();
        settings.canvas.width = 0.0;
        let err = render_flow(&snapshot(), &settings).unwrap_err();
        assert!(err.contains("canvas"));
    }

    #[test]
    fn render_produces_svg_document() {
        let svg = render_flow(&snapshot(), &Settings::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("class=\"pattern\"").count(), 2);
    }
}
