use crate::aggregate::aggregate;
use crate::category::CardLibrary;
use crate::classify::classify_entries;
use crate::config::{TierThresholds, TiershiftConfig};
use crate::error::ReconError;
use crate::model::{ClassifiedEntry, ReportMeta, SnapshotRecord, TierReport};
use crate::normalize::{load_snapshot_rows, normalize};
use crate::reconcile::reconcile;
use crate::report::build_report;

/// Both normalized snapshots for one run.
pub struct SnapshotInput {
    pub baseline: Vec<SnapshotRecord>,
    pub current: Vec<SnapshotRecord>,
}

/// Run reconciliation per config. Returns sections + statistics.
pub fn run(config: &TiershiftConfig, input: &SnapshotInput, library: &CardLibrary) -> Result<TierReport, ReconError> {
    let thresholds = config.tier_thresholds()?;
    run_with_thresholds(&config.name, &thresholds, input, library)
}

pub fn run_with_thresholds(
    name: &str,
    thresholds: &TierThresholds,
    input: &SnapshotInput,
    library: &CardLibrary,
) -> Result<TierReport, ReconError> {
    let entries = reconcile(&input.baseline, &input.current, library)?;
    let classified = classify_entries(entries, thresholds);
    let statistics = aggregate(&classified)?;
    let sections = build_report(&classified, &statistics);

    log::info!(
        "{} entries: {} migrated, net value change {} cents",
        statistics.overall.count,
        sections
            .iter()
            .filter(|s| s.bucket.is_migration())
            .map(|s| s.entries.len())
            .sum::<usize>(),
        statistics.overall.net_value_change_cents,
    );

    Ok(TierReport {
        meta: ReportMeta {
            config_name: name.to_string(),
            bulk_ceiling_cents: thresholds.bulk_ceiling_cents,
            trade_floor_cents: thresholds.trade_floor_cents,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        statistics,
        sections,
    })
}

/// Load CSV text into normalized records, applying the configured column
/// mapping and malformed-row policy.
pub fn load_snapshot(csv_data: &str, config: &TiershiftConfig) -> Result<Vec<SnapshotRecord>, ReconError> {
    let rows = load_snapshot_rows(csv_data, &config.columns)?;
    normalize(&rows, config.malformed)
}

impl TierReport {
    /// Every classified entry, in section order.
    pub fn entries(&self) -> impl Iterator<Item = &ClassifiedEntry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }
}
