use crate::data::filter::{FilterSelection, FilteredView, filtered_indices};
use crate::data::loader::LoadReport;
use crate::data::model::CrashDataset;

// ---------------------------------------------------------------------------
// Dashboard session state
// ---------------------------------------------------------------------------

/// State for one dashboard session, independent of any rendering layer.
///
/// Owns the dataset for the life of the process: loaded once, never mutated
/// afterwards, so readers need no locking.  The current selection's result
/// is cached as indices and recomputed in one synchronous pass per
/// interaction.  Constructed by the application entry point and passed by
/// reference – there is no global.
#[derive(Default)]
pub struct DashboardState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<CrashDataset>,

    /// Report from the most recent successful load.
    pub report: LoadReport,

    /// Current filter criteria (None until a dataset with records arrives).
    pub selection: Option<FilterSelection>,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,
}

impl DashboardState {
    /// Ingest a freshly loaded dataset and reset the selection to the full
    /// year range with no country/operator constraint.
    pub fn set_dataset(&mut self, dataset: CrashDataset, report: LoadReport) {
        self.selection = dataset
            .year_bounds
            .map(|(lo, hi)| FilterSelection::years(lo, hi));
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
        self.report = report;
    }

    /// Install a new selection and recompute the cached indices.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = Some(selection);
        self.refilter();
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        if let (Some(dataset), Some(selection)) = (&self.dataset, &self.selection) {
            self.visible_indices = filtered_indices(dataset, selection);
        } else {
            self.visible_indices.clear();
        }
    }

    /// The current working subset, for the aggregations.  `None` until a
    /// dataset is loaded.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| FilteredView::from_indices(ds, self.visible_indices.clone()))
    }

    /// Inclusive (min, max) year of the loaded dataset, for the year slider.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.dataset.as_ref().and_then(|ds| ds.year_bounds)
    }

    /// Sorted distinct countries, for the country picker.
    pub fn countries(&self) -> &[String] {
        self.dataset.as_ref().map(|ds| ds.countries.as_slice()).unwrap_or(&[])
    }

    /// Sorted distinct operators, for the airline picker.
    pub fn operators(&self) -> &[String] {
        self.dataset.as_ref().map(|ds| ds.operators.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::data::model::CrashRecord;

    fn record(year: i32, country: &str) -> CrashRecord {
        CrashRecord::new(
            NaiveDate::from_ymd_opt(year, 4, 8).unwrap(),
            Some(country.to_string()),
            None,
            None,
            None,
            None,
        )
    }

    fn loaded_state() -> DashboardState {
        let dataset = CrashDataset::from_records(vec![
            record(1950, "USA"),
            record(1960, "France"),
            record(1970, "USA"),
        ]);
        let mut state = DashboardState::default();
        state.set_dataset(
            dataset,
            LoadReport {
                rows_read: 4,
                rows_kept: 3,
                rows_dropped: 1,
            },
        );
        state
    }

    #[test]
    fn fresh_state_has_nothing_visible() {
        let state = DashboardState::default();
        assert!(state.view().is_none());
        assert_eq!(state.year_bounds(), None);
        assert!(state.countries().is_empty());
    }

    #[test]
    fn set_dataset_selects_the_full_year_range() {
        let state = loaded_state();
        assert_eq!(state.selection, Some(FilterSelection::years(1950, 1970)));
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.view().unwrap().len(), 3);
        assert_eq!(state.report.rows_dropped, 1);
    }

    #[test]
    fn set_selection_refreshes_the_cache() {
        let mut state = loaded_state();
        state.set_selection(FilterSelection::years(1955, 1975).with_country("USA"));
        assert_eq!(state.visible_indices, vec![2]);

        let view = state.view().unwrap();
        assert_eq!(view.iter().map(|r| r.year).collect::<Vec<_>>(), vec![1970]);
    }

    #[test]
    fn empty_dataset_leaves_no_selection() {
        let mut state = DashboardState::default();
        state.set_dataset(CrashDataset::from_records(Vec::new()), LoadReport::default());
        assert_eq!(state.selection, None);
        assert_eq!(state.view().unwrap().len(), 0);
    }
}
