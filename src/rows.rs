//! Helpers over lists of records and single mappings.
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::node::{Mapping, Node};

/// Records where, for every `(key, needle)` pair, the field exists and its
/// text contains `needle` (case-sensitive).
pub fn filter_by_key_value_pairs(records: &[Mapping], pairs: &[(&str, &str)]) -> Vec<Mapping> {
    records
        .iter()
        .filter(|record| {
            pairs.iter().all(|(key, needle)| {
                record
                    .get(*key)
                    .and_then(Node::as_scalar)
                    .is_some_and(|value| value.to_text().contains(*needle))
            })
        })
        .cloned()
        .collect()
}

/// Copy of `map` with `key => value` placed right after `after`. Appended at
/// the end when `after` is missing. An existing `key` is moved.
pub fn insert_after_key(map: &Mapping, after: &str, key: &str, value: Node) -> Mapping {
    let mut out = map.clone();
    out.shift_remove(key);
    let at = out.get_index_of(after).map_or(out.len(), |i| i + 1);
    out.shift_insert(at, key.to_string(), value);
    out
}

/// Stable sort by a date-valued field. Accepts `YYYY-MM-DD`,
/// `YYYY-MM-DD HH:MM:SS` and RFC 3339; records without a readable date
/// come first in either direction.
pub fn sort_by_date(records: &[Mapping], key: &str, ascending: bool) -> Vec<Mapping> {
    let mut keyed: Vec<(Option<NaiveDateTime>, &Mapping)> = records
        .iter()
        .map(|record| (record_date(record, key), record))
        .collect();
    keyed.sort_by(|a, b| match (a.0, b.0) {
        (Some(x), Some(y)) if ascending => x.cmp(&y),
        (Some(x), Some(y)) => y.cmp(&x),
        (x, y) => x.is_some().cmp(&y.is_some()),
    });
    keyed.into_iter().map(|(_, record)| record.clone()).collect()
}

fn record_date(record: &Mapping, key: &str) -> Option<NaiveDateTime> {
    let text = record.get(key)?.as_scalar()?.to_text();
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Three-way quick sort; returns a new sorted vector.
pub fn quick_sort<T: PartialOrd + Clone>(values: &[T]) -> Vec<T> {
    let Some((pivot, rest)) = values.split_first() else {
        return Vec::new();
    };
    let mut less = Vec::new();
    let mut equal = vec![pivot.clone()];
    let mut greater = Vec::new();
    for v in rest {
        if v < pivot {
            less.push(v.clone());
        } else if v > pivot {
            greater.push(v.clone());
        } else {
            equal.push(v.clone());
        }
    }
    let mut out = quick_sort(&less);
    out.extend(equal);
    out.extend(quick_sort(&greater));
    out
}
