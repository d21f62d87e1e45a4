use crate::config::TierThresholds;
use crate::model::{ClassifiedEntry, ReconciledEntry, Tier, TierBucket};

/// Price → tier. Thresholds are inclusive on the lower bound of the higher tier.
pub fn tier_for(price_cents: i64, thresholds: &TierThresholds) -> Tier {
    if price_cents < thresholds.bulk_ceiling_cents {
        Tier::Bulk
    } else if price_cents < thresholds.trade_floor_cents {
        Tier::Dollar
    } else {
        Tier::Trade
    }
}

/// Pairwise lookup for two tiers.
pub fn migration(old: Tier, new: Tier) -> TierBucket {
    match (old, new) {
        (Tier::Bulk, Tier::Dollar) => TierBucket::BulkToDollar,
        (Tier::Bulk, Tier::Trade) => TierBucket::BulkToTrade,
        (Tier::Dollar, Tier::Bulk) => TierBucket::DollarToBulk,
        (Tier::Dollar, Tier::Trade) => TierBucket::DollarToTrade,
        (Tier::Trade, Tier::Bulk) => TierBucket::TradeToBulk,
        (Tier::Trade, Tier::Dollar) => TierBucket::TradeToDollar,
        (Tier::Bulk, Tier::Bulk) | (Tier::Dollar, Tier::Dollar) | (Tier::Trade, Tier::Trade) => {
            TierBucket::Unchanged
        }
    }
}

/// Bucket for one entry. New and gone short-circuit before any price check.
pub fn classify(entry: &ReconciledEntry, thresholds: &TierThresholds) -> TierBucket {
    if entry.is_new {
        TierBucket::New
    } else if entry.is_gone {
        TierBucket::Gone
    } else {
        migration(
            tier_for(entry.old_price_cents, thresholds),
            tier_for(entry.new_price_cents, thresholds),
        )
    }
}

/// Classify every entry once.
pub fn classify_entries(entries: Vec<ReconciledEntry>, thresholds: &TierThresholds) -> Vec<ClassifiedEntry> {
    entries
        .into_iter()
        .map(|entry| ClassifiedEntry {
            bucket: classify(&entry, thresholds),
            entry,
        })
        .collect()
}
