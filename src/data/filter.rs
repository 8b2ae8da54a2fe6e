use super::model::{CrashDataset, CrashRecord};

// ---------------------------------------------------------------------------
// FilterSelection – criteria for one interaction
// ---------------------------------------------------------------------------

/// Sentinel the dashboard pickers use for "no filter".
pub const ALL: &str = "All";

/// Transient filter criteria: an inclusive year range plus optional exact
/// country and operator matches.  Built fresh per interaction, applied once,
/// then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub year_low: i32,
    pub year_high: i32,
    /// `None` means no country constraint.
    pub country: Option<String>,
    /// `None` means no operator constraint.
    pub operator: Option<String>,
}

impl FilterSelection {
    /// Selection constrained only by an inclusive year range.
    pub fn years(year_low: i32, year_high: i32) -> Self {
        FilterSelection {
            year_low,
            year_high,
            country: None,
            operator: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Build a selection straight from picker values, mapping the `"All"`
    /// sentinel to "no constraint".
    pub fn from_controls(years: (i32, i32), country: &str, operator: &str) -> Self {
        let pick = |choice: &str| {
            if choice == ALL {
                None
            } else {
                Some(choice.to_string())
            }
        };
        FilterSelection {
            year_low: years.0,
            year_high: years.1,
            country: pick(country),
            operator: pick(operator),
        }
    }

    /// Whether `record` passes every active condition (AND-combined).
    ///
    /// Country/operator comparison is exact and case-sensitive; a record
    /// with a null field never matches an active constraint on it.
    pub fn matches(&self, record: &CrashRecord) -> bool {
        if record.year < self.year_low || record.year > self.year_high {
            return false;
        }
        if let Some(country) = &self.country {
            if record.country_region.as_deref() != Some(country.as_str()) {
                return false;
            }
        }
        if let Some(operator) = &self.operator {
            if record.operator.as_deref() != Some(operator.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Indices of records passing `selection`, in dataset order.
pub fn filtered_indices(dataset: &CrashDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| selection.matches(record))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView – the working subset handed to the aggregations
// ---------------------------------------------------------------------------

/// A read-only view over the records matching one selection.
///
/// Holds indices into the dataset, never record copies.  An empty view is a
/// valid state, not an error; every aggregation is total over it.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a CrashDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Wrap already-computed indices (e.g. the session cache).
    pub fn from_indices(dataset: &'a CrashDataset, indices: Vec<usize>) -> Self {
        FilteredView { dataset, indices }
    }

    /// Matching records in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &'a CrashRecord> + '_ {
        self.indices.iter().map(|&i| &self.dataset.records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// Apply `selection` to the whole dataset.
pub fn apply<'a>(dataset: &'a CrashDataset, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView::from_indices(dataset, filtered_indices(dataset, selection))
}
