use thiserror::Error;

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

// Column names as they appear in the published accident dataset.  All
// downstream code works on typed `CrashRecord` fields; these strings exist
// only at the ingestion boundary.
pub const COL_YEAR: &str = "Year";
pub const COL_MONTH: &str = "Month";
pub const COL_DAY: &str = "Day";
pub const COL_COUNTRY: &str = "Country/Region";
pub const COL_OPERATOR: &str = "Operator";
pub const COL_MANUFACTURER: &str = "Aircraft Manufacturer";
pub const COL_FATALITIES_AIR: &str = "Fatalities (air)";
pub const COL_FATALITIES_GROUND: &str = "Ground";

/// Columns date reconstruction cannot work without.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_YEAR, COL_MONTH, COL_DAY];

/// Columns the aggregations read when present.
pub const OPTIONAL_COLUMNS: [&str; 5] = [
    COL_COUNTRY,
    COL_OPERATOR,
    COL_MANUFACTURER,
    COL_FATALITIES_AIR,
    COL_FATALITIES_GROUND,
];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A load-fatal problem with the shape of the source table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("required column(s) missing from the dataset: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

/// Check that every required column is present.
///
/// Failure is fatal for this load attempt: the pipeline never proceeds to
/// normalization without the `Year`/`Month`/`Day` trio, and there is no
/// retry – a missing column is a configuration problem, not a transient one.
pub fn validate_columns(headers: &[String]) -> Result<(), SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns { missing })
    }
}

/// Optional columns absent from `headers`.  Their fields stay `None` on
/// every record; the loader warns once per column instead of failing.
pub fn absent_optional_columns(headers: &[String]) -> Vec<&'static str> {
    OPTIONAL_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == col))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_header_set_passes() {
        let mut all = REQUIRED_COLUMNS.to_vec();
        all.extend(OPTIONAL_COLUMNS);
        assert!(validate_columns(&headers(&all)).is_ok());
        assert!(absent_optional_columns(&headers(&all)).is_empty());
    }

    #[test]
    fn missing_day_is_fatal() {
        let err = validate_columns(&headers(&["Year", "Month", "Operator"])).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns {
                missing: vec!["Day".to_string()]
            }
        );
    }

    #[test]
    fn all_missing_required_columns_are_named() {
        let err = validate_columns(&headers(&["Operator", "Ground"])).unwrap_err();
        let SchemaError::MissingColumns { missing } = err;
        assert_eq!(missing, vec!["Year", "Month", "Day"]);
    }

    #[test]
    fn error_message_names_the_columns() {
        let err = validate_columns(&headers(&["Year", "Month"])).unwrap_err();
        assert!(err.to_string().contains("Day"));
    }

    #[test]
    fn absent_optional_columns_are_reported_not_fatal() {
        let hdrs = headers(&["Year", "Month", "Day", "Operator"]);
        assert!(validate_columns(&hdrs).is_ok());
        let absent = absent_optional_columns(&hdrs);
        assert!(absent.contains(&COL_COUNTRY));
        assert!(!absent.contains(&COL_OPERATOR));
    }
}
