//! `tiershift run | validate | classify | history` command bodies.

use std::path::{Path, PathBuf};

use tiershift_recon::classify::{migration, tier_for};
use tiershift_recon::engine::{self, SnapshotInput};
use tiershift_recon::normalize::parse_price_cents;
use tiershift_recon::model::SnapshotRecord;
use tiershift_recon::{CardLibrary, MalformedPolicy, TiershiftConfig};

use crate::export::export_inventory;
use crate::history::{self, HistoryRecord};
use crate::render::{format_cents, format_change, render_text, ReportHeader};
use crate::settings::{load_config, LoadedConfig};
use crate::snapshots::{baseline_before, latest, list_snapshots, snapshot_date};
use crate::CliError;

pub struct RunArgs {
    pub current: Option<PathBuf>,
    pub baseline: Option<PathBuf>,
    pub library: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub all: bool,
    pub no_history: bool,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// run
// ============================================================================

/// Pick current and baseline snapshots, discovering whichever was not given.
fn resolve_snapshots(loaded: &LoadedConfig, args: &RunArgs) -> Result<(PathBuf, PathBuf), CliError> {
    if let (Some(current), Some(baseline)) = (&args.current, &args.baseline) {
        return Ok((current.clone(), baseline.clone()));
    }

    let suffix = &loaded.config.snapshot_suffix;
    let data_dir = loaded.data_dir();
    let snapshots = list_snapshots(&data_dir, suffix).map_err(CliError::io)?;
    log::debug!("{} dated snapshots in {}", snapshots.len(), data_dir.display());

    let current = match &args.current {
        Some(p) => p.clone(),
        None => latest(&snapshots)
            .map(|s| s.path.clone())
            .ok_or_else(|| {
                CliError::usage(format!("no snapshots matching YYYYMMDD{suffix} in {}", data_dir.display()))
                    .with_hint("pass the current snapshot path, or set data_dir in the config")
            })?,
    };

    let baseline = match &args.baseline {
        Some(p) => p.clone(),
        None => {
            let date = snapshot_date(&current, suffix).ok_or_else(|| {
                CliError::usage(format!(
                    "cannot infer a baseline for {}: name is not YYYYMMDD{suffix}",
                    current.display()
                ))
                .with_hint("pass --baseline")
            })?;
            baseline_before(&snapshots, date)
                .map(|s| s.path.clone())
                .ok_or_else(|| {
                    CliError::usage(format!("no snapshot older than {} in {}", date, data_dir.display()))
                        .with_hint("pass --baseline")
                })?
        }
    };

    Ok((current, baseline))
}

fn read_snapshot(path: &Path, config: &TiershiftConfig) -> Result<Vec<SnapshotRecord>, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    let records = engine::load_snapshot(&text, config).map_err(|e| {
        let mut err = CliError::recon(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })?;
    log::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Missing library is not fatal: every item sorts under `Unknown`.
fn read_library(path: &Path) -> Result<CardLibrary, CliError> {
    if !path.exists() {
        log::warn!("card library {} not found; categories will be Unknown", path.display());
        return Ok(CardLibrary::default());
    }
    CardLibrary::load(path).map_err(|e| {
        let mut err = CliError::recon(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))
}

pub fn cmd_run(config_path: Option<&Path>, args: RunArgs) -> Result<(), CliError> {
    let report_to_stdout = args.report.as_deref() == Some(Path::new("-"));
    if report_to_stdout && args.json {
        return Err(CliError::usage("--report - conflicts with --json: stdout carries the JSON")
            .with_hint("write the text report to a file with --report FILE"));
    }

    let loaded = load_config(config_path)?;
    let config = &loaded.config;

    let (current_path, baseline_path) = resolve_snapshots(&loaded, &args)?;
    log::debug!("baseline {} / current {}", baseline_path.display(), current_path.display());

    let input = SnapshotInput {
        baseline: read_snapshot(&baseline_path, config)?,
        current: read_snapshot(&current_path, config)?,
    };
    let library_path = args.library.clone().unwrap_or_else(|| loaded.library_path());
    let library = read_library(&library_path)?;

    let report = engine::run(config, &input, &library).map_err(CliError::recon)?;

    let baseline_name = display_name(&baseline_path);
    let current_name = display_name(&current_path);
    let header = ReportHeader {
        baseline: &baseline_name,
        current: &current_name,
    };

    let json_output = if args.json || args.output.is_some() {
        Some(
            serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?,
        )
    } else {
        None
    };
    let text = render_text(&report, &header, args.all);

    match (&json_output, args.json) {
        (Some(json), true) => println!("{json}"),
        _ => print!("{text}"),
    }

    if let (Some(path), Some(json)) = (&args.output, &json_output) {
        write_file(path, json)?;
        eprintln!("Wrote {}", path.display());
    }
    if let Some(path) = args.report.as_deref().filter(|_| !report_to_stdout) {
        write_file(path, &text)?;
        eprintln!("Wrote {}", path.display());
    }
    if let Some(path) = &args.export {
        export_inventory(&report, path).map_err(CliError::io)?;
        eprintln!("Wrote {}", path.display());
    }

    let record = HistoryRecord::from_report(&report, &baseline_name, &current_name);
    if !args.no_history {
        history::append(&loaded.history_path(), &record).map_err(CliError::io)?;
    }

    eprintln!(
        "{} → {}: {} items, {} migrated, net {}",
        baseline_name,
        current_name,
        record.overall.count,
        record.migrated,
        format_change(record.overall.net_value_change_cents),
    );

    Ok(())
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config_path: Option<&Path>) -> Result<(), CliError> {
    let loaded = load_config(config_path)?;
    let config = &loaded.config;
    let thresholds = config.tier_thresholds().map_err(CliError::recon)?;

    match &loaded.source {
        Some(path) => println!("config:     {}", path.display()),
        None => println!("config:     (built-in defaults)"),
    }
    println!("name:       {}", config.name);
    println!("data_dir:   {}", loaded.data_dir().display());
    let library = loaded.library_path();
    if library.exists() {
        println!("library:    {}", library.display());
    } else {
        println!("library:    {} (missing)", library.display());
    }
    println!(
        "tiers:      bulk < {} <= dollar < {} <= trade",
        format_cents(thresholds.bulk_ceiling_cents),
        format_cents(thresholds.trade_floor_cents),
    );
    println!(
        "malformed:  {}",
        match config.malformed {
            MalformedPolicy::Abort => "abort",
            MalformedPolicy::Skip => "skip",
        }
    );
    eprintln!("Config is valid");
    Ok(())
}

// ============================================================================
// classify
// ============================================================================

fn parse_price_arg(raw: &str) -> Result<i64, CliError> {
    parse_price_cents(raw).ok_or_else(|| {
        CliError::usage(format!("invalid price '{raw}'"))
            .with_hint("prices are non-negative decimals, e.g. 0.50 or $6.00")
    })
}

pub fn cmd_classify(config_path: Option<&Path>, old_price: &str, new_price: &str) -> Result<(), CliError> {
    let loaded = load_config(config_path)?;
    let thresholds = loaded.config.tier_thresholds().map_err(CliError::recon)?;

    let old_cents = parse_price_arg(old_price)?;
    let new_cents = parse_price_arg(new_price)?;
    let old_tier = tier_for(old_cents, &thresholds);
    let new_tier = tier_for(new_cents, &thresholds);

    println!("{}", migration(old_tier, new_tier));
    eprintln!(
        "{} ({}) → {} ({})",
        format_cents(old_cents),
        old_tier,
        format_cents(new_cents),
        new_tier
    );
    Ok(())
}

// ============================================================================
// history
// ============================================================================

pub fn cmd_history(config_path: Option<&Path>, json: bool, limit: Option<usize>) -> Result<(), CliError> {
    let loaded = load_config(config_path)?;
    let path = loaded.history_path();
    let mut records = history::read(&path).map_err(CliError::io)?;

    if let Some(n) = limit {
        let skip = records.len().saturating_sub(n);
        records.drain(..skip);
    }

    if json {
        let out = serde_json::to_string_pretty(&records)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("No runs recorded in {}", path.display());
        return Ok(());
    }

    for r in &records {
        println!(
            "{}  {} → {}  {} items, {} migrated, net {}, value {}",
            r.run_at,
            r.baseline,
            r.current,
            r.overall.count,
            r.migrated,
            format_change(r.overall.net_value_change_cents),
            format_cents(r.overall.total_value_cents),
        );
    }
    Ok(())
}
