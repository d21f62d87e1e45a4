//! Classified inventory export: one CSV row per reconciled entry, with its
//! bucket and sort category, in report order.

use std::path::Path;

use tiershift_recon::model::{ClassifiedEntry, TierReport};

const HEADERS: [&str; 15] = [
    "bucket",
    "sort_category",
    "name",
    "edition",
    "card_number",
    "condition",
    "foil",
    "old_count",
    "new_count",
    "old_price",
    "new_price",
    "count_change",
    "price_change",
    "total_change",
    "status",
];

/// Cents as a plain decimal string for spreadsheets: `-3.05`.
fn decimal(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn status(c: &ClassifiedEntry) -> &'static str {
    if c.entry.is_new {
        "new"
    } else if c.entry.is_gone {
        "gone"
    } else {
        "held"
    }
}

pub fn write_inventory_csv<W: std::io::Write>(report: &TierReport, out: W) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADERS).map_err(|e| e.to_string())?;

    for c in report.entries() {
        let e = &c.entry;
        let id = &e.identity;
        writer
            .write_record([
                c.bucket.to_string(),
                e.sort_category.clone(),
                id.name.clone(),
                id.edition.clone(),
                id.card_number.clone(),
                id.condition.clone(),
                if id.foil { "foil".to_string() } else { String::new() },
                e.old_count.to_string(),
                e.new_count.to_string(),
                decimal(e.old_price_cents),
                decimal(e.new_price_cents),
                e.count_change.to_string(),
                decimal(e.price_change_cents),
                decimal(e.total_change_cents),
                status(c).to_string(),
            ])
            .map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())
}

pub fn export_inventory(report: &TierReport, path: &Path) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| format!("cannot create {}: {e}", path.display()))?;
    write_inventory_csv(report, file)
}
