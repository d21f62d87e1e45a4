//! Grouping and ordering of classified entries for rendering.
//!
//! Sections follow `TierBucket` order. Within a section entries sort by sort
//! category, then name, both compared case-insensitively with a case-sensitive
//! tie-break, then by the remaining identity fields so the order is total.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{ClassifiedEntry, ReportSection, Statistics, TierBucket};

/// Build one section per bucket, in report order. Buckets with no entries
/// still get a section.
pub fn build_report(entries: &[ClassifiedEntry], statistics: &Statistics) -> Vec<ReportSection> {
    let mut grouped: BTreeMap<TierBucket, Vec<ClassifiedEntry>> =
        TierBucket::ALL.iter().map(|b| (*b, Vec::new())).collect();
    for entry in entries {
        grouped.entry(entry.bucket).or_default().push(entry.clone());
    }

    grouped
        .into_iter()
        .map(|(bucket, mut entries)| {
            entries.sort_by(compare_entries);
            // absent only for hand-built statistics; an empty bucket is a zero block
            let statistics = statistics.per_bucket.get(&bucket).cloned().unwrap_or_default();
            ReportSection {
                bucket,
                statistics,
                entries,
            }
        })
        .collect()
}

/// Keep only the six tier-change sections.
pub fn migrations_only(sections: Vec<ReportSection>) -> Vec<ReportSection> {
    sections.into_iter().filter(|s| s.bucket.is_migration()).collect()
}

/// Entries of a section grouped under their sort category, in order.
pub fn by_category(section: &ReportSection) -> Vec<(&str, Vec<&ClassifiedEntry>)> {
    let mut groups: Vec<(&str, Vec<&ClassifiedEntry>)> = Vec::new();
    for entry in &section.entries {
        let category = entry.entry.sort_category.as_str();
        if let Some((current, list)) = groups.last_mut() {
            if *current == category {
                list.push(entry);
                continue;
            }
        }
        groups.push((category, vec![entry]));
    }
    groups
}

fn compare_entries(a: &ClassifiedEntry, b: &ClassifiedEntry) -> Ordering {
    let (a, b) = (&a.entry, &b.entry);
    collate(&a.sort_category, &b.sort_category)
        .then_with(|| collate(&a.identity.name, &b.identity.name))
        .then_with(|| a.identity.cmp(&b.identity))
}

fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
