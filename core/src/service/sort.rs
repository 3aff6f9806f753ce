use std::cmp::Ordering;

use crate::model::entry::ChargingLogEntry;
use crate::model::sort::{SortColumn, SortDirection, SortSpec};

fn compare(a: &ChargingLogEntry, b: &ChargingLogEntry, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Date => a.date.cmp(&b.date),
        SortColumn::Duration => a.duration.total_cmp(&b.duration),
        SortColumn::User => a.user.to_lowercase().cmp(&b.user.to_lowercase()),
    }
}

/// Stable sort: equal keys keep their input order in both directions.
pub fn sort_entries(entries: &[ChargingLogEntry], spec: &SortSpec) -> Vec<ChargingLogEntry> {
    let mut sorted = entries.to_vec();
    if let Some(column) = spec.column {
        sorted.sort_by(|a, b| match spec.direction {
            SortDirection::Ascending => compare(a, b, column),
            SortDirection::Descending => compare(b, a, column),
        });
    }
    sorted
}
