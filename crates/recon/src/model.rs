use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Composite key of one stock-keeping line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemIdentity {
    pub name: String,
    pub edition: String,
    pub condition: String,
    pub foil: bool,
    pub card_number: String,
}

impl fmt::Display for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({} #{}, {}", self.name, self.edition, self.card_number, self.condition)?;
        if self.foil {
            write!(f, ", foil")?;
        }
        write!(f, ")")
    }
}

/// A snapshot row as read from CSV, before any numeric coercion.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRow {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub name: String,
    pub edition: String,
    pub condition: String,
    pub foil: String,
    pub card_number: String,
    pub count: String,
    pub price: String,
}

/// A normalized snapshot line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub identity: ItemIdentity,
    pub count: i64,
    pub price_cents: i64,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// One identity joined across both snapshots. Derived deltas are computed at
/// construction; only `sort_category` is attached afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledEntry {
    #[serde(flatten)]
    pub identity: ItemIdentity,
    pub old_count: i64,
    pub new_count: i64,
    pub old_price_cents: i64,
    pub new_price_cents: i64,
    pub is_new: bool,
    pub is_gone: bool,
    pub sort_category: String,
    pub count_change: i64,
    pub price_change_cents: i64,
    pub total_change_cents: i64,
}

impl ReconciledEntry {
    /// Join one identity. Fails with `ValueOverflow` when a line value
    /// (count × price) or the total change does not fit in `i64` cents.
    pub fn new(
        identity: ItemIdentity,
        old: Option<&SnapshotRecord>,
        new: Option<&SnapshotRecord>,
    ) -> Result<Self, ReconError> {
        let (old_count, old_price_cents) = old.map(|r| (r.count, r.price_cents)).unwrap_or((0, 0));
        let (new_count, new_price_cents) = new.map(|r| (r.count, r.price_cents)).unwrap_or((0, 0));

        let deltas = || -> Option<(i64, i64, i64)> {
            let new_value = new_price_cents.checked_mul(new_count)?;
            let old_value = old_price_cents.checked_mul(old_count)?;
            Some((
                new_count.checked_sub(old_count)?,
                new_price_cents.checked_sub(old_price_cents)?,
                new_value.checked_sub(old_value)?,
            ))
        };
        let Some((count_change, price_change_cents, total_change_cents)) = deltas() else {
            return Err(ReconError::ValueOverflow { identity });
        };

        Ok(Self {
            identity,
            old_count,
            new_count,
            old_price_cents,
            new_price_cents,
            is_new: old.is_none(),
            is_gone: new.is_none(),
            sort_category: String::new(),
            count_change,
            price_change_cents,
            total_change_cents,
        })
    }

    /// Current holding value (new price × new count). `None` on overflow.
    pub fn current_value_cents(&self) -> Option<i64> {
        self.new_price_cents.checked_mul(self.new_count)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Price band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Bulk,
    Dollar,
    Trade,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bulk => write!(f, "bulk"),
            Self::Dollar => write!(f, "dollar"),
            Self::Trade => write!(f, "trade"),
        }
    }
}

/// Migration bucket. Variant order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierBucket {
    TradeToDollar,
    TradeToBulk,
    DollarToTrade,
    DollarToBulk,
    BulkToDollar,
    BulkToTrade,
    New,
    Gone,
    Unchanged,
}

impl TierBucket {
    pub const ALL: [TierBucket; 9] = [
        Self::TradeToDollar,
        Self::TradeToBulk,
        Self::DollarToTrade,
        Self::DollarToBulk,
        Self::BulkToDollar,
        Self::BulkToTrade,
        Self::New,
        Self::Gone,
        Self::Unchanged,
    ];

    /// True for the six tier-change buckets.
    pub fn is_migration(&self) -> bool {
        !matches!(self, Self::New | Self::Gone | Self::Unchanged)
    }

    /// Human label, e.g. `trade → dollar`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TradeToDollar => "trade → dollar",
            Self::TradeToBulk => "trade → bulk",
            Self::DollarToTrade => "dollar → trade",
            Self::DollarToBulk => "dollar → bulk",
            Self::BulkToDollar => "bulk → dollar",
            Self::BulkToTrade => "bulk → trade",
            Self::New => "new",
            Self::Gone => "gone",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for TierBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TradeToDollar => write!(f, "trade_to_dollar"),
            Self::TradeToBulk => write!(f, "trade_to_bulk"),
            Self::DollarToTrade => write!(f, "dollar_to_trade"),
            Self::DollarToBulk => write!(f, "dollar_to_bulk"),
            Self::BulkToDollar => write!(f, "bulk_to_dollar"),
            Self::BulkToTrade => write!(f, "bulk_to_trade"),
            Self::New => write!(f, "new"),
            Self::Gone => write!(f, "gone"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedEntry {
    pub bucket: TierBucket,
    #[serde(flatten)]
    pub entry: ReconciledEntry,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsBlock {
    pub count: usize,
    pub net_count_change: i64,
    pub net_value_change_cents: i64,
    pub positive_count: usize,
    pub negative_count: usize,
    pub gross_positive_cents: i64,
    pub gross_negative_cents: i64,
    pub total_value_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub overall: StatisticsBlock,
    pub per_bucket: BTreeMap<TierBucket, StatisticsBlock>,
}

// ---------------------------------------------------------------------------
// Report + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub bucket: TierBucket,
    pub statistics: StatisticsBlock,
    pub entries: Vec<ClassifiedEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierReport {
    pub meta: ReportMeta,
    pub statistics: Statistics,
    pub sections: Vec<ReportSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub config_name: String,
    pub bulk_ceiling_cents: i64,
    pub trade_floor_cents: i64,
    pub engine_version: String,
    pub run_at: String,
}
