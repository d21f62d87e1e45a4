use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::category::CardLibrary;
use crate::error::{DuplicateIdentity, ReconError, Side};
use crate::model::{ItemIdentity, ReconciledEntry, SnapshotRecord};

/// Full outer join of two snapshots on item identity.
///
/// Fails with `DuplicateIdentity` when either side lists an identity more than
/// once; every offending key from both sides is reported. Sort categories are
/// resolved once per distinct name.
pub fn reconcile(
    old: &[SnapshotRecord],
    new: &[SnapshotRecord],
    library: &CardLibrary,
) -> Result<Vec<ReconciledEntry>, ReconError> {
    let mut duplicates = Vec::new();
    check_duplicates(old, Side::Baseline, &mut duplicates);
    check_duplicates(new, Side::Current, &mut duplicates);
    if !duplicates.is_empty() {
        duplicates.sort_by(|a, b| (a.side.as_str(), &a.identity).cmp(&(b.side.as_str(), &b.identity)));
        return Err(ReconError::DuplicateIdentity(duplicates));
    }

    let old_map: BTreeMap<&ItemIdentity, &SnapshotRecord> = old.iter().map(|r| (&r.identity, r)).collect();
    let new_map: BTreeMap<&ItemIdentity, &SnapshotRecord> = new.iter().map(|r| (&r.identity, r)).collect();

    let keys: BTreeSet<&ItemIdentity> = old_map.keys().chain(new_map.keys()).copied().collect();

    let mut categories: HashMap<&str, String> = HashMap::new();
    let mut entries = Vec::with_capacity(keys.len());

    for key in keys {
        let mut entry = ReconciledEntry::new(
            key.clone(),
            old_map.get(key).copied(),
            new_map.get(key).copied(),
        )?;
        entry.sort_category = categories
            .entry(key.name.as_str())
            .or_insert_with(|| library.resolve(&key.name))
            .clone();
        entries.push(entry);
    }

    log::debug!(
        "reconciled {} baseline + {} current records into {} entries ({} distinct names)",
        old.len(),
        new.len(),
        entries.len(),
        categories.len(),
    );

    Ok(entries)
}

fn check_duplicates(records: &[SnapshotRecord], side: Side, out: &mut Vec<DuplicateIdentity>) {
    let mut counts: HashMap<&ItemIdentity, usize> = HashMap::new();
    for record in records {
        *counts.entry(&record.identity).or_insert(0) += 1;
    }
    for (identity, count) in counts {
        if count > 1 {
            out.push(DuplicateIdentity {
                side,
                identity: identity.clone(),
                count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CardMeta;

    fn record(name: &str, foil: bool, count: i64, price_cents: i64) -> SnapshotRecord {
        SnapshotRecord {
            identity: ItemIdentity {
                name: name.into(),
                edition: "X".into(),
                condition: "NM".into(),
                foil,
                card_number: "1".into(),
            },
            count,
            price_cents,
        }
    }

    fn library() -> CardLibrary {
        let mut cards = HashMap::new();
        cards.insert(
            "Bolt".to_string(),
            CardMeta {
                colors: vec!["R".into()],
                types: vec!["Instant".into()],
            },
        );
        CardLibrary::new(cards)
    }

    #[test]
    fn outer_join_defaults() {
        let old = vec![record("Bolt", false, 4, 50), record("Gone", false, 2, 300)];
        let new = vec![record("Bolt", false, 3, 250), record("Fresh", false, 1, 5000)];
        let entries = reconcile(&old, &new, &library()).unwrap();
        assert_eq!(entries.len(), 3);

        let by_name = |n: &str| entries.iter().find(|e| e.identity.name == n).unwrap();

        let bolt = by_name("Bolt");
        assert!(!bolt.is_new && !bolt.is_gone);
        assert_eq!(bolt.count_change, -1);
        assert_eq!(bolt.price_change_cents, 200);
        assert_eq!(bolt.total_change_cents, 250 * 3 - 50 * 4);
        assert_eq!(bolt.sort_category, "Red");

        let gone = by_name("Gone");
        assert!(gone.is_gone && !gone.is_new);
        assert_eq!(gone.new_count, 0);
        assert_eq!(gone.new_price_cents, 0);
        assert_eq!(gone.total_change_cents, -600);
        assert_eq!(gone.sort_category, "Unknown");

        let fresh = by_name("Fresh");
        assert!(fresh.is_new && !fresh.is_gone);
        assert_eq!(fresh.old_count, 0);
        assert_eq!(fresh.old_price_cents, 0);
        assert_eq!(fresh.count_change, 1);
    }

    #[test]
    fn foil_is_part_of_identity() {
        let old = vec![record("Bolt", false, 1, 50)];
        let new = vec![record("Bolt", true, 1, 400)];
        let entries = reconcile(&old, &new, &library()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.is_gone && !e.identity.foil));
        assert!(entries.iter().any(|e| e.is_new && e.identity.foil));
    }

    #[test]
    fn duplicates_are_reported_not_merged() {
        let old = vec![record("Bolt", false, 1, 50), record("Bolt", false, 2, 50)];
        let new = vec![
            record("Bolt", false, 1, 50),
            record("Bolt", true, 1, 50),
            record("Bolt", true, 1, 60),
            record("Bolt", true, 1, 70),
        ];
        let err = reconcile(&old, &new, &library()).unwrap_err();
        match err {
            ReconError::DuplicateIdentity(dups) => {
                assert_eq!(dups.len(), 2);
                assert_eq!(dups[0].side, Side::Baseline);
                assert_eq!(dups[0].count, 2);
                assert_eq!(dups[1].side, Side::Current);
                assert!(dups[1].identity.foil);
                assert_eq!(dups[1].count, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_message_names_identity() {
        let old = vec![record("Bolt", false, 1, 50), record("Bolt", false, 1, 50)];
        let err = reconcile(&old, &[], &library()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("baseline \"Bolt\" (X #1, NM) appears 2 times"), "{msg}");
    }

    #[test]
    fn huge_line_value_is_an_error_not_a_wrap() {
        use crate::config::{ColumnMapping, MalformedPolicy};
        use crate::normalize::{load_snapshot_rows, normalize};

        let csv = "\
Count,Name,Edition,Card Number,Condition,Foil,Price
100000000000,Bolt,X,1,NM,,\"$1,000,000.00\"
";
        let rows = load_snapshot_rows(csv, &ColumnMapping::default()).unwrap();
        let new = normalize(&rows, MalformedPolicy::Abort).unwrap();
        let old = vec![record("Bolt", false, 1, 50)];

        match reconcile(&old, &new, &library()) {
            Err(ReconError::ValueOverflow { identity }) => assert_eq!(identity.name, "Bolt"),
            other => panic!("expected ValueOverflow, got {other:?}"),
        }
    }

    #[test]
    fn large_values_below_the_limit_are_exact() {
        let new = vec![record("Bolt", false, 1_000_000, 100_000_000_000)];
        let entries = reconcile(&[], &new, &library()).unwrap();
        assert_eq!(entries[0].total_change_cents, 100_000_000_000_000_000);
    }

    #[test]
    fn empty_inputs() {
        let entries = reconcile(&[], &[], &library()).unwrap();
        assert!(entries.is_empty());
    }
}
