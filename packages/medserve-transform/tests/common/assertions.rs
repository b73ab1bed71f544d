//! Custom assertions for record verification

use std::collections::BTreeSet;

use medserve_transform::Record;

/// Assert that no two records share an id
pub fn assert_unique_ids<'a>(records: impl IntoIterator<Item = &'a Record>) {
    let mut seen = BTreeSet::new();
    for record in records {
        assert!(
            seen.insert(record.id().to_string()),
            "Record {} was emitted more than once",
            record.id()
        );
    }
}

/// Ids of `records` in emission order
pub fn record_ids<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    records.into_iter().map(|r| r.id().to_string()).collect()
}

/// Assert the set of emitted ids, ignoring order
pub fn assert_record_set<'a>(records: impl IntoIterator<Item = &'a Record>, expected: &[u64]) {
    let actual: BTreeSet<String> = records.into_iter().map(|r| r.id().to_string()).collect();
    let expected: BTreeSet<String> = expected.iter().map(u64::to_string).collect();
    assert_eq!(
        actual, expected,
        "Expected records {expected:?}, got {actual:?}"
    );
}

/// Find a record by concept id, panicking with the available ids
pub fn find_record<'a>(records: &'a [Record], id: u64) -> &'a Record {
    let id = id.to_string();
    records.iter().find(|r| r.id() == id).unwrap_or_else(|| {
        panic!(
            "Record {id} not found, available: {:?}",
            record_ids(records)
        )
    })
}
