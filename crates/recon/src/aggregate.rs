use std::collections::BTreeMap;

use crate::error::ReconError;
use crate::model::{ClassifiedEntry, ReconciledEntry, Statistics, StatisticsBlock, TierBucket};

impl StatisticsBlock {
    /// Fold one entry into the block. Fails with `ValueOverflow` when a
    /// running sum leaves the `i64` cents range.
    pub fn add(&mut self, entry: &ReconciledEntry) -> Result<(), ReconError> {
        let overflow = || ReconError::ValueOverflow {
            identity: entry.identity.clone(),
        };
        let change = entry.total_change_cents;

        self.net_count_change = self.net_count_change.checked_add(entry.count_change).ok_or_else(overflow)?;
        self.net_value_change_cents = self.net_value_change_cents.checked_add(change).ok_or_else(overflow)?;
        if change > 0 {
            self.positive_count += 1;
            self.gross_positive_cents = self.gross_positive_cents.checked_add(change).ok_or_else(overflow)?;
        } else if change < 0 {
            self.negative_count += 1;
            self.gross_negative_cents = self.gross_negative_cents.checked_add(change).ok_or_else(overflow)?;
        }
        self.total_value_cents = entry
            .current_value_cents()
            .and_then(|value| self.total_value_cents.checked_add(value))
            .ok_or_else(overflow)?;
        self.count += 1;
        Ok(())
    }
}

/// Whole-set and per-bucket statistics. Every bucket is present, empty ones
/// with a zero block.
pub fn aggregate(entries: &[ClassifiedEntry]) -> Result<Statistics, ReconError> {
    let mut per_bucket: BTreeMap<TierBucket, StatisticsBlock> =
        TierBucket::ALL.iter().map(|b| (*b, StatisticsBlock::default())).collect();
    let mut overall = StatisticsBlock::default();

    for classified in entries {
        overall.add(&classified.entry)?;
        per_bucket
            .entry(classified.bucket)
            .or_default()
            .add(&classified.entry)?;
    }

    Ok(Statistics { overall, per_bucket })
}
