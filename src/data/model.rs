use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

// ---------------------------------------------------------------------------
// RawValue – a single cell as read from disk
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, mirroring what the source formats can
/// carry before any cleaning has happened.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::String(s) => write!(f, "{s}"),
            RawValue::Integer(i) => write!(f, "{i}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Null => write!(f, "<null>"),
        }
    }
}

impl RawValue {
    /// Interpret the value as an integer.  Accepts proper integers, floats
    /// with a zero fractional part, and string numerals of either form
    /// (`"1977"`, `"1977.0"`) – the shapes a year or day column takes after
    /// a trip through a spreadsheet.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Integer(i) => Some(*i),
            RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            RawValue::String(s) => {
                let tok = s.trim();
                if let Ok(i) = tok.parse::<i64>() {
                    return Some(i);
                }
                match tok.parse::<f64>() {
                    Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Borrow the value as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

/// One uncleaned row: column name → cell value.
pub type RawRow = BTreeMap<String, RawValue>;

// ---------------------------------------------------------------------------
// CrashRecord – one normalized accident event
// ---------------------------------------------------------------------------

/// A single accident record after normalization.
///
/// `year` and `month` are always re-derived from `date`, never taken from
/// the raw columns, so the three can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrashRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub country_region: Option<String>,
    pub operator: Option<String>,
    pub aircraft_manufacturer: Option<String>,
    pub fatalities_air: Option<u32>,
    pub fatalities_ground: Option<u32>,
}

impl CrashRecord {
    /// Build a record around a constructed date, deriving `year`/`month`
    /// from it.
    pub fn new(
        date: NaiveDate,
        country_region: Option<String>,
        operator: Option<String>,
        aircraft_manufacturer: Option<String>,
        fatalities_air: Option<u32>,
        fatalities_ground: Option<u32>,
    ) -> Self {
        CrashRecord {
            date,
            year: date.year(),
            month: date.month(),
            country_region,
            operator,
            aircraft_manufacturer,
            fatalities_air,
            fatalities_ground,
        }
    }
}

// ---------------------------------------------------------------------------
// CrashDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full normalized dataset with pre-computed lookup indexes.
///
/// Write-once: built by the loader, then only read.  Records keep their
/// source-file order.
#[derive(Debug, Clone)]
pub struct CrashDataset {
    /// All records, in source order.
    pub records: Vec<CrashRecord>,
    /// Sorted distinct countries (nulls excluded) – feeds the country picker.
    pub countries: Vec<String>,
    /// Sorted distinct operators (nulls excluded) – feeds the airline picker.
    pub operators: Vec<String>,
    /// Inclusive (min, max) year over all records; `None` for an empty set.
    pub year_bounds: Option<(i32, i32)>,
}

impl CrashDataset {
    /// Build the lookup indexes from the normalized records.
    pub fn from_records(records: Vec<CrashRecord>) -> Self {
        let countries = distinct_strings(&records, |r| r.country_region.as_deref());
        let operators = distinct_strings(&records, |r| r.operator.as_deref());
        let year_bounds = records.iter().fold(None, |bounds, r| match bounds {
            None => Some((r.year, r.year)),
            Some((lo, hi)) => Some((lo.min(r.year), hi.max(r.year))),
        });
        CrashDataset {
            records,
            countries,
            operators,
            year_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records satisfying `predicate`, in dataset order.
    pub fn filter<P>(&self, predicate: P) -> Vec<&CrashRecord>
    where
        P: Fn(&CrashRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }
}

/// Sorted distinct non-null values of a string field.
pub fn distinct_strings<F>(records: &[CrashRecord], field: F) -> Vec<String>
where
    F: Fn(&CrashRecord) -> Option<&str>,
{
    let unique: BTreeSet<&str> = records.iter().filter_map(|r| field(r)).collect();
    unique.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, month: u32, day: u32, country: Option<&str>) -> CrashRecord {
        CrashRecord::new(
            NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            country.map(str::to_string),
            None,
            None,
            None,
            None,
        )
    }

    #[test]
    fn as_i64_accepts_integer_like_shapes() {
        assert_eq!(RawValue::Integer(1977).as_i64(), Some(1977));
        assert_eq!(RawValue::Float(1977.0).as_i64(), Some(1977));
        assert_eq!(RawValue::String("1977".into()).as_i64(), Some(1977));
        assert_eq!(RawValue::String(" 1977.0 ".into()).as_i64(), Some(1977));
    }

    #[test]
    fn as_i64_rejects_non_integers() {
        assert_eq!(RawValue::Float(1977.5).as_i64(), None);
        assert_eq!(RawValue::String("March".into()).as_i64(), None);
        assert_eq!(RawValue::Null.as_i64(), None);
        assert_eq!(RawValue::Bool(true).as_i64(), None);
        assert_eq!(RawValue::Float(f64::NAN).as_i64(), None);
    }

    #[test]
    fn record_year_month_come_from_date() {
        let r = record(1961, 7, 19, None);
        assert_eq!(r.year, r.date.year());
        assert_eq!(r.month, r.date.month());
    }

    #[test]
    fn dataset_indexes_are_sorted_and_null_free() {
        let ds = CrashDataset::from_records(vec![
            record(1950, 1, 1, Some("USA")),
            record(1972, 3, 4, None),
            record(1948, 6, 2, Some("Brazil")),
            record(1960, 2, 9, Some("USA")),
        ]);
        assert_eq!(ds.countries, vec!["Brazil".to_string(), "USA".to_string()]);
        assert_eq!(ds.year_bounds, Some((1948, 1972)));
    }

    #[test]
    fn empty_dataset_has_no_year_bounds() {
        let ds = CrashDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.year_bounds, None);
        assert!(ds.countries.is_empty());
    }

    #[test]
    fn filter_preserves_source_order() {
        let ds = CrashDataset::from_records(vec![
            record(1950, 1, 1, Some("USA")),
            record(1972, 3, 4, Some("France")),
            record(1955, 6, 2, Some("USA")),
        ]);
        let hits = ds.filter(|r| r.country_region.as_deref() == Some("USA"));
        let years: Vec<i32> = hits.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1950, 1955]);
    }
}
