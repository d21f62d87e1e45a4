// Dated snapshot discovery: files named `YYYYMMDD{suffix}` inside the data dir.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedSnapshot {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// Date encoded in a snapshot file name, if it follows the naming scheme.
pub fn snapshot_date(path: &Path, suffix: &str) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let prefix = name.strip_suffix(suffix)?;
    if prefix.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(prefix, "%Y%m%d").ok()
}

/// All dated snapshots in `dir`, oldest first.
pub fn list_snapshots(dir: &Path, suffix: &str) -> Result<Vec<DatedSnapshot>, String> {
    let read = std::fs::read_dir(dir).map_err(|e| format!("cannot list {}: {e}", dir.display()))?;

    let mut snapshots: Vec<DatedSnapshot> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| snapshot_date(&path, suffix).map(|date| DatedSnapshot { date, path }))
        .collect();

    snapshots.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path)));
    Ok(snapshots)
}

pub fn latest(snapshots: &[DatedSnapshot]) -> Option<&DatedSnapshot> {
    snapshots.last()
}

/// Newest snapshot strictly older than `date`.
pub fn baseline_before(snapshots: &[DatedSnapshot], date: NaiveDate) -> Option<&DatedSnapshot> {
    snapshots.iter().rev().find(|s| s.date < date)
}
