//! Data engine for an air crash analysis dashboard.
//!
//! Loads a tabular dataset of aviation accident records, reconstructs a
//! calendar date for every record from its `Year`/`Month`/`Day` columns,
//! and serves the filter and aggregation queries behind the dashboard's
//! metric cards and charts.  The rendering layer lives elsewhere; this
//! crate ends at the query interface.
//!
//! ```no_run
//! use crashdash::{aggregate, load_file, DashboardState, FilterSelection};
//!
//! # fn main() -> anyhow::Result<()> {
//! let (dataset, report) = load_file("data/aircrashesFull_2024.csv".as_ref())?;
//!
//! let mut state = DashboardState::default();
//! state.set_dataset(dataset, report);
//! state.set_selection(FilterSelection::years(1940, 2024).with_country("USA"));
//!
//! let view = state.view().expect("dataset is loaded");
//! let trend = aggregate::yearly_counts(view.iter());
//! let busiest = aggregate::top_operators(view.iter(), aggregate::DEFAULT_TOP_N);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod state;

pub use data::aggregate;
pub use data::filter::{ALL, FilterSelection, FilteredView};
pub use data::loader::{LoadReport, load_file};
pub use data::model::{CrashDataset, CrashRecord};
pub use data::schema::SchemaError;
pub use state::DashboardState;
