use std::collections::HashSet;

use crate::{DealRecord, SymbolUniverse};

/// Records whose symbol belongs to the universe. An empty universe keeps all.
pub fn filter_universe(records: Vec<DealRecord>, universe: &SymbolUniverse) -> Vec<DealRecord> {
    if universe.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| universe.contains(record.symbol()))
        .collect()
}

/// Drop exact duplicates, keeping the first occurrence of each record.
pub fn dedup(records: Vec<DealRecord>) -> Vec<DealRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}

pub fn filter_and_dedup(records: Vec<DealRecord>, universe: &SymbolUniverse) -> Vec<DealRecord> {
    dedup(filter_universe(records, universe))
}
