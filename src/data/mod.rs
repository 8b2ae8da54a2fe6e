/// Data layer: core types, loading, normalization, filtering, aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → raw rows, check required columns
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  rebuild dates, coerce cells, drop bad rows
///   └───────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CrashDataset  │  Vec<CrashRecord>, distinct/bounds indexes
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │ ───▶ │ aggregate  │  year/country/operator subset → chart series
///   └──────────┘      └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod schema;
