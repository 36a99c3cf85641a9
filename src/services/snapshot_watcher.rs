use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FlowError, Result};
use crate::models::DaySnapshot;

use super::flow_model::FlowModel;

pub fn load_snapshot(path: &Path) -> Result<DaySnapshot> {
    let content = std::fs::read_to_string(path).map_err(|e| FlowError::io(path, e))?;
    parse_snapshot(&content)
}

pub fn parse_snapshot(content: &str) -> Result<DaySnapshot> {
    if content.trim().is_empty() {
        return Err(FlowError::InvalidSnapshot("snapshot is empty".to_string()));
    }
    let snapshot: DaySnapshot = serde_json::from_str(content)?;

    let out_of_range = snapshot.patterns.iter().filter(|p| p.intensity > 10).count();
    if out_of_range > 0 {
        log::warn!(
            "[Snapshot] {} patterns on {} have intensity above 10, bars will saturate",
            out_of_range,
            snapshot.date
        );
    }
    Ok(snapshot)
}

/// Re-reads `source` every `interval` and rewrites `output` with a freshly
/// laid-out SVG. Each pass replaces the model's data wholesale. A failed read
/// keeps the last good render on disk and is retried on the next tick.
///
/// Runs until `max_passes` passes have completed, or forever when `None`.
pub async fn watch_snapshot(
    source: PathBuf,
    output: PathBuf,
    mut model: FlowModel,
    interval: Duration,
    max_passes: Option<u64>,
) -> Result<FlowModel> {
    log::info!(
        "[SnapshotWatcher] watching {} every {}s",
        source.display(),
        interval.as_secs()
    );

    let mut ticker = tokio::time::interval(interval);
    let mut passes = 0u64;

    loop {
        ticker.tick().await;

        match refresh_from(&source, &mut model).await {
            Ok(()) => {
                tokio::fs::write(&output, model.render_svg())
                    .await
                    .map_err(|e| FlowError::io(&output, e))?;
                log::debug!("[SnapshotWatcher] wrote {}", output.display());
            }
            Err(e) => {
                log::error!("[SnapshotWatcher] refresh failed: {}", e);
            }
        }

        passes += 1;
        if max_passes.is_some_and(|max| passes >= max) {
            return Ok(model);
        }
    }
}

async fn refresh_from(source: &Path, model: &mut FlowModel) -> Result<()> {
    let content = tokio::fs::read_to_string(source)
        .await
        .map_err(|e| FlowError::io(source, e))?;
    let snapshot = parse_snapshot(&content)?;
    model.refresh(snapshot.patterns, snapshot.cascades);
    Ok(())
}
