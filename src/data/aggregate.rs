use std::collections::{BTreeMap, HashMap, HashSet};

use super::model::CrashRecord;

/// Bar-chart size the dashboard uses for the "top countries" / "top
/// airlines" views.
pub const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Generic primitives
// ---------------------------------------------------------------------------

/// Group records by a derived key and count.
///
/// Sparse: keys with no matching records are absent.  Densification, where
/// a fixed-domain chart needs it, is the caller's job (see
/// [`monthly_counts`]).
pub fn count_by<'a, K, I, F>(records: I, key: F) -> BTreeMap<K, u64>
where
    I: IntoIterator<Item = &'a CrashRecord>,
    K: Ord,
    F: Fn(&CrashRecord) -> K,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(key(record)).or_insert(0) += 1;
    }
    counts
}

/// The `n` most frequent values of a string key, ordered by count
/// descending.  Null keys are skipped; ties keep first-encountered order.
pub fn top_n<'a, I, F>(records: I, key: F, n: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a CrashRecord>,
    F: Fn(&'a CrashRecord) -> Option<&'a str>,
{
    // Counts live in a Vec in first-encounter order; the stable sort below
    // then leaves equal counts in that order.
    let mut counts: Vec<(&str, u64)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for record in records {
        if let Some(k) = key(record) {
            match slots.get(k) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(k, counts.len());
                    counts.push((k, 1));
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts.into_iter().map(|(k, c)| (k.to_string(), c)).collect()
}

/// Sum a numeric field, counting missing values as 0.
pub fn sum_field<'a, I, F>(records: I, field: F) -> u64
where
    I: IntoIterator<Item = &'a CrashRecord>,
    F: Fn(&CrashRecord) -> Option<u32>,
{
    records
        .into_iter()
        .filter_map(|r| field(r))
        .map(u64::from)
        .sum()
}

/// Distinct non-null cardinality of a string field.
pub fn distinct_count<'a, I, F>(records: I, field: F) -> usize
where
    I: IntoIterator<Item = &'a CrashRecord>,
    F: Fn(&'a CrashRecord) -> Option<&'a str>,
{
    records
        .into_iter()
        .filter_map(field)
        .collect::<HashSet<_>>()
        .len()
}

// ---------------------------------------------------------------------------
// Named aggregates consumed by the dashboard views
// ---------------------------------------------------------------------------

/// Crashes per year, ascending by year (yearly trend line).  Years with no
/// crashes in the input are absent.
pub fn yearly_counts<'a, I>(records: I) -> Vec<(i32, u64)>
where
    I: IntoIterator<Item = &'a CrashRecord>,
{
    count_by(records, |r| r.year).into_iter().collect()
}

/// Crashes per calendar month, dense: always exactly 12 `(month, count)`
/// pairs with months 1..=12 in order, zero-filled.  The seasonality chart
/// depicts all twelve months even when some have no crashes.
pub fn monthly_counts<'a, I>(records: I) -> Vec<(u32, u64)>
where
    I: IntoIterator<Item = &'a CrashRecord>,
{
    let mut dense: Vec<(u32, u64)> = (1..=12).map(|m| (m, 0)).collect();
    for record in records {
        dense[(record.month - 1) as usize].1 += 1;
    }
    dense
}

/// The `n` countries with the most crashes (geography bar chart).
pub fn top_countries<'a, I>(records: I, n: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a CrashRecord>,
{
    top_n(records, |r| r.country_region.as_deref(), n)
}

/// The `n` operators with the most crashes.
pub fn top_operators<'a, I>(records: I, n: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a CrashRecord>,
{
    top_n(records, |r| r.operator.as_deref(), n)
}

/// (air, ground) fatality pairs for the correlation scatter.
///
/// Records where either side is missing are excluded outright – coercing a
/// missing value to 0 would bias the regression toward the origin.
pub fn fatality_pairs<'a, I>(records: I) -> Vec<(u32, u32)>
where
    I: IntoIterator<Item = &'a CrashRecord>,
{
    records
        .into_iter()
        .filter_map(|r| Some((r.fatalities_air?, r.fatalities_ground?)))
        .collect()
}

/// Total air fatalities (metric card), missing values as 0.
pub fn total_fatalities<'a, I>(records: I) -> u64
where
    I: IntoIterator<Item = &'a CrashRecord>,
{
    sum_field(records, |r| r.fatalities_air)
}

/// Number of distinct countries affected (metric card).
pub fn country_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a CrashRecord>,
{
    distinct_count(records, |r| r.country_region.as_deref())
}

/// Number of distinct operators involved (metric card).
pub fn operator_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a CrashRecord>,
{
    distinct_count(records, |r| r.operator.as_deref())
}
