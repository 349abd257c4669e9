//! Weekly aggregation. All views here borrow the collection and never
//! reorder it; positions in the results are storage positions.

use crate::models::collection::LogCollection;
use crate::models::week::{Positioned, WeekGroup, WeekKey};
use crate::utils::date::iso_week_key;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

pub type WeekMap<'a> = BTreeMap<WeekKey, WeekGroup<'a>>;

/// Bucket dated entries by ISO (year, week). Entries inside a group are
/// ascending by timestamp; equal timestamps keep storage order.
pub fn group_by_week(collection: &LogCollection) -> WeekMap<'_> {
    let mut map: WeekMap<'_> = BTreeMap::new();

    for (position, entry) in collection.iter().enumerate() {
        let Some(key) = entry.week else { continue };
        map.entry(key)
            .or_insert_with(|| WeekGroup {
                key,
                entries: Vec::new(),
            })
            .entries
            .push(Positioned { position, entry });
    }

    for group in map.values_mut() {
        group.entries.sort_by_key(|p| p.entry.timestamp);
    }

    map
}

/// Most recent week first.
pub fn ordered_groups(map: WeekMap<'_>) -> Vec<(WeekKey, WeekGroup<'_>)> {
    map.into_iter().rev().collect()
}

pub fn current_week_key(now: &NaiveDateTime) -> WeekKey {
    iso_week_key(now)
}

/// Entries of a single week, ascending. Empty when the week has none.
pub fn week_entries(collection: &LogCollection, key: WeekKey) -> WeekGroup<'_> {
    group_by_week(collection)
        .remove(&key)
        .unwrap_or(WeekGroup {
            key,
            entries: Vec::new(),
        })
}

/// Entries whose timestamp could not be read, in storage order.
pub fn undated(collection: &LogCollection) -> Vec<Positioned<'_>> {
    collection
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_time_valid())
        .map(|(position, entry)| Positioned { position, entry })
        .collect()
}

/// Newest-first list view; undated entries go last.
pub fn chronological(collection: &LogCollection) -> Vec<Positioned<'_>> {
    let mut out: Vec<Positioned<'_>> = collection
        .iter()
        .enumerate()
        .map(|(position, entry)| Positioned { position, entry })
        .collect();
    out.sort_by(|a, b| b.entry.timestamp.cmp(&a.entry.timestamp));
    out
}
