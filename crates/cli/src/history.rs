// Run history: one JSON object per line, appended after each run.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tiershift_recon::model::{StatisticsBlock, TierReport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub run_at: String,
    pub config_name: String,
    pub baseline: String,
    pub current: String,
    pub bulk_ceiling_cents: i64,
    pub trade_floor_cents: i64,
    pub migrated: usize,
    pub overall: StatisticsBlock,
}

impl HistoryRecord {
    pub fn from_report(report: &TierReport, baseline: &str, current: &str) -> Self {
        Self {
            run_at: report.meta.run_at.clone(),
            config_name: report.meta.config_name.clone(),
            baseline: baseline.to_string(),
            current: current.to_string(),
            bulk_ceiling_cents: report.meta.bulk_ceiling_cents,
            trade_floor_cents: report.meta.trade_floor_cents,
            migrated: report
                .sections
                .iter()
                .filter(|s| s.bucket.is_migration())
                .map(|s| s.entries.len())
                .sum(),
            overall: report.statistics.overall.clone(),
        }
    }
}

pub fn append(path: &Path, record: &HistoryRecord) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| format!("cannot create {}: {e}", parent.display()))?;
    }
    let line = serde_json::to_string(record).map_err(|e| format!("JSON serialization error: {e}"))?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    writeln!(file, "{line}").map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    log::debug!("appended run to {}", path.display());
    Ok(())
}

/// Read all records. A missing file is an empty history; unreadable lines
/// are skipped with a warning.
pub fn read(path: &Path) -> Result<Vec<HistoryRecord>, String> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;

    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HistoryRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("{}:{}: skipping unreadable history line: {e}", path.display(), i + 1),
        }
    }
    Ok(records)
}
