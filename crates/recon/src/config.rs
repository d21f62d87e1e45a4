use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every key has a default, so an empty file is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TiershiftConfig {
    pub name: String,
    /// Snapshot directory, relative to the config file.
    pub data_dir: String,
    /// Card metadata JSON, relative to `data_dir`.
    pub library: String,
    /// Run history (JSON Lines), relative to `data_dir`.
    pub history: String,
    /// Dated snapshots are named `YYYYMMDD{snapshot_suffix}`.
    pub snapshot_suffix: String,
    pub malformed: MalformedPolicy,
    pub thresholds: ThresholdConfig,
    pub columns: ColumnMapping,
}

impl Default for TiershiftConfig {
    fn default() -> Self {
        Self {
            name: "collection".into(),
            data_dir: "data".into(),
            library: "AllCards.json".into(),
            history: "history.jsonl".into(),
            snapshot_suffix: "-magic-cards.csv".into(),
            malformed: MalformedPolicy::default(),
            thresholds: ThresholdConfig::default(),
            columns: ColumnMapping::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Malformed rows
// ---------------------------------------------------------------------------

/// What the loader does with a row whose price or count does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    #[default]
    Abort,
    Skip,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Tier thresholds as written in the config file, in currency units.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub bulk_ceiling: f64,
    pub trade_floor: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            bulk_ceiling: 1.0,
            trade_floor: 6.0,
        }
    }
}

/// Validated tier thresholds in cents. Each value is the entry price of the
/// higher tier: a price equal to `bulk_ceiling_cents` is `dollar`, a price
/// equal to `trade_floor_cents` is `trade`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThresholds {
    pub bulk_ceiling_cents: i64,
    pub trade_floor_cents: i64,
}

pub const DEFAULT_BULK_CEILING_CENTS: i64 = 100;
pub const DEFAULT_TRADE_FLOOR_CENTS: i64 = 600;

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            bulk_ceiling_cents: DEFAULT_BULK_CEILING_CENTS,
            trade_floor_cents: DEFAULT_TRADE_FLOOR_CENTS,
        }
    }
}

impl TierThresholds {
    pub fn new(bulk_ceiling_cents: i64, trade_floor_cents: i64) -> Result<Self, ReconError> {
        if bulk_ceiling_cents <= 0 {
            return Err(ReconError::ConfigValidation(format!(
                "bulk_ceiling must be positive, got {bulk_ceiling_cents} cents"
            )));
        }
        if trade_floor_cents <= bulk_ceiling_cents {
            return Err(ReconError::ConfigValidation(format!(
                "trade_floor ({trade_floor_cents} cents) must be above bulk_ceiling ({bulk_ceiling_cents} cents)"
            )));
        }
        Ok(Self {
            bulk_ceiling_cents,
            trade_floor_cents,
        })
    }
}

impl ThresholdConfig {
    pub fn to_thresholds(&self) -> Result<TierThresholds, ReconError> {
        for (key, value) in [("bulk_ceiling", self.bulk_ceiling), ("trade_floor", self.trade_floor)] {
            if !value.is_finite() {
                return Err(ReconError::ConfigValidation(format!("{key} must be a finite number")));
            }
        }
        TierThresholds::new(to_cents(self.bulk_ceiling), to_cents(self.trade_floor))
    }
}

fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Header names in snapshot CSVs. Defaults match a deckbox.org inventory export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub name: String,
    pub edition: String,
    pub condition: String,
    pub foil: String,
    pub card_number: String,
    pub count: String,
    pub price: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: "Name".into(),
            edition: "Edition".into(),
            condition: "Condition".into(),
            foil: "Foil".into(),
            card_number: "Card Number".into(),
            count: "Count".into(),
            price: "Price".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl TiershiftConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: TiershiftConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        self.thresholds.to_thresholds()?;

        if self.snapshot_suffix.is_empty() {
            return Err(ReconError::ConfigValidation(
                "snapshot_suffix must not be empty".into(),
            ));
        }

        let c = &self.columns;
        for (key, header) in [
            ("name", &c.name),
            ("edition", &c.edition),
            ("condition", &c.condition),
            ("card_number", &c.card_number),
            ("count", &c.count),
            ("price", &c.price),
        ] {
            if header.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "columns.{key} must name a header"
                )));
            }
        }

        Ok(())
    }

    /// Validated thresholds. Infallible after `from_toml`.
    pub fn tier_thresholds(&self) -> Result<TierThresholds, ReconError> {
        self.thresholds.to_thresholds()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
