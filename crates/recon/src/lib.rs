//! `tiershift-recon`: snapshot reconciliation and price-tier migration engine.
//!
//! Pure engine crate: receives pre-loaded snapshots and card metadata, returns
//! classified, aggregated and ordered results. No CLI dependencies; the only
//! IO is the optional file loaders on `CardLibrary`.

pub mod aggregate;
pub mod category;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod report;

pub use category::CardLibrary;
pub use config::{MalformedPolicy, TierThresholds, TiershiftConfig};
pub use engine::{load_snapshot, run, SnapshotInput};
pub use error::ReconError;
pub use model::{ClassifiedEntry, ReconciledEntry, StatisticsBlock, TierBucket, TierReport};
