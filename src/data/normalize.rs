use chrono::NaiveDate;

use super::model::{CrashRecord, RawRow, RawValue};
use super::schema;

// ---------------------------------------------------------------------------
// Cell coercions
// ---------------------------------------------------------------------------

/// Map a full English month name to its number.
fn month_from_name(name: &str) -> Option<u32> {
    Some(match name {
        "January" => 1,
        "February" => 2,
        "March" => 3,
        "April" => 4,
        "May" => 5,
        "June" => 6,
        "July" => 7,
        "August" => 8,
        "September" => 9,
        "October" => 10,
        "November" => 11,
        "December" => 12,
        _ => return None,
    })
}

/// Resolve a raw month cell to 1..=12.
///
/// Month names go through the fixed table; values that are already
/// integer-like pass through when in range.  Everything else fails the
/// record's date construction downstream.
fn coerce_month(value: &RawValue) -> Option<u32> {
    if let Some(name) = value.as_str() {
        if let Some(month) = month_from_name(name) {
            return Some(month);
        }
    }
    match value.as_i64() {
        Some(m @ 1..=12) => Some(m as u32),
        _ => None,
    }
}

fn coerce_year(value: &RawValue) -> Option<i32> {
    i32::try_from(value.as_i64()?).ok()
}

fn text_field(row: &RawRow, column: &str) -> Option<String> {
    row.get(column)?.as_str().map(str::to_string)
}

/// Non-negative count column.  Negative or non-numeric cells become `None`
/// rather than failing the record – the field is optional.
fn count_field(row: &RawRow, column: &str) -> Option<u32> {
    row.get(column)
        .and_then(RawValue::as_i64)
        .and_then(|n| u32::try_from(n).ok())
}

// ---------------------------------------------------------------------------
// Row normalization
// ---------------------------------------------------------------------------

/// Turn one raw row into a typed record, or `None` if no valid calendar
/// date can be reconstructed from it.
///
/// Policies, in order:
/// * missing/null `Day` defaults to 1 (first of month) – a missing day is
///   not a reason to throw away an otherwise usable year/month;
/// * a `Day` cell that is present but malformed is NOT defaulted and fails
///   the record;
/// * the (year, month, day) triple must form a real calendar date – Feb 30
///   or month 13 fail here, per record, never globally;
/// * the kept record's `year`/`month` are re-derived from the constructed
///   date, not copied from the raw cells.
pub fn normalize_row(row: &RawRow) -> Option<CrashRecord> {
    let year = coerce_year(row.get(schema::COL_YEAR)?)?;
    let month = coerce_month(row.get(schema::COL_MONTH)?)?;
    let day = match row.get(schema::COL_DAY) {
        None | Some(RawValue::Null) => 1,
        Some(value) => u32::try_from(value.as_i64()?).ok()?,
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    Some(CrashRecord::new(
        date,
        text_field(row, schema::COL_COUNTRY),
        text_field(row, schema::COL_OPERATOR),
        text_field(row, schema::COL_MANUFACTURER),
        count_field(row, schema::COL_FATALITIES_AIR),
        count_field(row, schema::COL_FATALITIES_GROUND),
    ))
}

/// Normalize every raw row, dropping the ones that fail.  Returns the kept
/// records in source order together with the drop count.
pub fn normalize_rows(rows: &[RawRow]) -> (Vec<CrashRecord>, usize) {
    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in rows {
        match normalize_row(row) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    (records, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, RawValue)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn s(text: &str) -> RawValue {
        RawValue::String(text.to_string())
    }

    #[test]
    fn month_names_map_through_the_fixed_table() {
        assert_eq!(coerce_month(&s("January")), Some(1));
        assert_eq!(coerce_month(&s("December")), Some(12));
        // Exact names only – no abbreviations, no case folding.
        assert_eq!(coerce_month(&s("jan")), None);
        assert_eq!(coerce_month(&s("JANUARY")), None);
    }

    #[test]
    fn integer_like_months_pass_through_in_range() {
        assert_eq!(coerce_month(&RawValue::Integer(7)), Some(7));
        assert_eq!(coerce_month(&RawValue::Float(7.0)), Some(7));
        assert_eq!(coerce_month(&s("7")), Some(7));
        assert_eq!(coerce_month(&RawValue::Integer(13)), None);
        assert_eq!(coerce_month(&RawValue::Integer(0)), None);
    }

    #[test]
    fn missing_day_defaults_to_first_of_month() {
        let r = row(&[
            ("Year", RawValue::Integer(1972)),
            ("Month", s("March")),
            ("Day", RawValue::Null),
        ]);
        let rec = normalize_row(&r).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(1972, 3, 1).unwrap());

        // An absent Day cell behaves the same as an explicit null.
        let r = row(&[("Year", RawValue::Integer(1972)), ("Month", s("March"))]);
        assert_eq!(normalize_row(&r).unwrap().date, rec.date);
    }

    #[test]
    fn malformed_day_is_not_defaulted() {
        let r = row(&[
            ("Year", RawValue::Integer(1972)),
            ("Month", s("March")),
            ("Day", s("noon")),
        ]);
        assert!(normalize_row(&r).is_none());
    }

    #[test]
    fn impossible_calendar_dates_drop_the_record() {
        let r = row(&[
            ("Year", RawValue::Integer(1990)),
            ("Month", s("February")),
            ("Day", RawValue::Integer(30)),
        ]);
        assert!(normalize_row(&r).is_none());
    }

    #[test]
    fn leap_day_survives_on_leap_years_only() {
        let leap = row(&[
            ("Year", RawValue::Integer(2000)),
            ("Month", s("February")),
            ("Day", RawValue::Integer(29)),
        ]);
        assert!(normalize_row(&leap).is_some());

        let common = row(&[
            ("Year", RawValue::Integer(1999)),
            ("Month", s("February")),
            ("Day", RawValue::Integer(29)),
        ]);
        assert!(normalize_row(&common).is_none());
    }

    #[test]
    fn float_and_string_years_coerce_to_integer() {
        for year in [RawValue::Float(1948.0), s("1948"), s("1948.0")] {
            let r = row(&[("Year", year), ("Month", s("June")), ("Day", RawValue::Integer(5))]);
            assert_eq!(normalize_row(&r).unwrap().year, 1948);
        }

        let bad = row(&[("Year", s("unknown")), ("Month", s("June")), ("Day", RawValue::Integer(5))]);
        assert!(normalize_row(&bad).is_none());
    }

    #[test]
    fn year_and_month_are_rederived_from_the_date() {
        let r = row(&[
            ("Year", s("1977.0")),
            ("Month", s("September")),
            ("Day", RawValue::Integer(27)),
        ]);
        let rec = normalize_row(&r).unwrap();
        assert_eq!((rec.year, rec.month), (1977, 9));
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(1977, 9, 27).unwrap());
    }

    #[test]
    fn fatality_cells_coerce_or_go_missing() {
        let r = row(&[
            ("Year", RawValue::Integer(1985)),
            ("Month", s("August")),
            ("Day", RawValue::Integer(12)),
            ("Fatalities (air)", RawValue::Float(520.0)),
            ("Ground", s("n/a")),
        ]);
        let rec = normalize_row(&r).unwrap();
        assert_eq!(rec.fatalities_air, Some(520));
        assert_eq!(rec.fatalities_ground, None);

        let negative = row(&[
            ("Year", RawValue::Integer(1985)),
            ("Month", s("August")),
            ("Day", RawValue::Integer(12)),
            ("Fatalities (air)", RawValue::Integer(-3)),
        ]);
        assert_eq!(normalize_row(&negative).unwrap().fatalities_air, None);
    }

    #[test]
    fn normalize_rows_counts_drops() {
        let rows = vec![
            row(&[("Year", RawValue::Integer(1950)), ("Month", s("May")), ("Day", RawValue::Integer(2))]),
            row(&[("Year", RawValue::Integer(1950)), ("Month", s("Smarch")), ("Day", RawValue::Integer(2))]),
            row(&[("Year", RawValue::Null), ("Month", s("May")), ("Day", RawValue::Integer(2))]),
            row(&[("Year", RawValue::Integer(1951)), ("Month", s("May")), ("Day", RawValue::Null)]),
        ];
        let (records, dropped) = normalize_rows(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(dropped, 2);
        // Source order survives.
        assert_eq!(records[0].year, 1950);
        assert_eq!(records[1].year, 1951);
    }
}
