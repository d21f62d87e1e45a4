//! Snapshot loading and normalization.
//!
//! `load_snapshot_rows` maps CSV headers onto the identity/count/price contract and
//! drops every other column. `normalize` coerces the string fields of each row.

use crate::config::{ColumnMapping, MalformedPolicy};
use crate::error::ReconError;
use crate::model::{ItemIdentity, SnapshotRecord, SnapshotRow};

/// Literal marker the export writes into the foil column.
pub const FOIL_MARKER: &str = "foil";

/// Read snapshot CSV text into raw rows using the configured header names.
/// The foil column is optional; every other mapped column must be present.
pub fn load_snapshot_rows(csv_data: &str, columns: &ColumnMapping) -> Result<Vec<SnapshotRow>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn { column: name.into() })
    };

    let name_idx = idx(&columns.name)?;
    let edition_idx = idx(&columns.edition)?;
    let condition_idx = idx(&columns.condition)?;
    let card_number_idx = idx(&columns.card_number)?;
    let count_idx = idx(&columns.count)?;
    let price_idx = idx(&columns.price)?;
    let foil_idx = headers.iter().position(|h| h == &columns.foil);

    let mut rows = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        let field = |ix: usize| record.get(ix).unwrap_or("").trim().to_string();

        rows.push(SnapshotRow {
            row: i + 1,
            name: field(name_idx),
            edition: field(edition_idx),
            condition: field(condition_idx),
            foil: foil_idx.map(field).unwrap_or_default(),
            card_number: field(card_number_idx),
            count: field(count_idx),
            price: field(price_idx),
        });
    }

    log::debug!("loaded {} snapshot rows", rows.len());
    Ok(rows)
}

/// Normalize every row. `Abort` stops at the first malformed row; `Skip` logs
/// and drops it.
pub fn normalize(rows: &[SnapshotRow], policy: MalformedPolicy) -> Result<Vec<SnapshotRecord>, ReconError> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match normalize_row(row) {
            Ok(record) => records.push(record),
            Err(e) if policy == MalformedPolicy::Skip => {
                log::warn!("skipping malformed row: {e}");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(records)
}

pub fn normalize_row(row: &SnapshotRow) -> Result<SnapshotRecord, ReconError> {
    let malformed = |field: &str, value: &str| ReconError::MalformedRecord {
        row: row.row,
        field: field.into(),
        value: value.into(),
    };

    let count = parse_count(&row.count).ok_or_else(|| malformed("count", &row.count))?;
    let price_cents = parse_price_cents(&row.price).ok_or_else(|| malformed("price", &row.price))?;

    Ok(SnapshotRecord {
        identity: ItemIdentity {
            name: row.name.clone(),
            edition: row.edition.clone(),
            condition: row.condition.clone(),
            foil: parse_foil(&row.foil),
            card_number: row.card_number.clone(),
        },
        count,
        price_cents,
    })
}

/// Absent/empty → false; the foil marker (any case) → true.
pub fn parse_foil(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(FOIL_MARKER)
}

/// Non-negative integer count.
pub fn parse_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse a currency-formatted price into cents:
/// - Strip `$`, commas, whitespace
/// - At most one `.`; fractions beyond two digits round half-up
/// - Returns None for negatives, empty input, or anything else non-numeric
pub fn parse_price_cents(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole_cents = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().ok()?.checked_mul(100)?
    };

    let digits: Vec<i64> = frac.bytes().map(|b| (b - b'0') as i64).collect();
    let mut frac_cents = digits.first().copied().unwrap_or(0) * 10 + digits.get(1).copied().unwrap_or(0);
    if digits.get(2).copied().unwrap_or(0) >= 5 {
        frac_cents += 1;
    }

    whole_cents.checked_add(frac_cents)
}
