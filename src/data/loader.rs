use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CrashDataset, RawRow, RawValue};
use super::normalize;
use super::schema;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// What happened while loading: how many raw rows were seen and how many
/// survived date reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

/// Load an accident dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the published column names (recommended)
/// * `.json`    – records-oriented array, `[{ "Year": 1972, ... }, ...]`
/// * `.parquet` – flat scalar columns under the same names
pub fn load_file(path: &Path) -> Result<(CrashDataset, LoadReport)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (headers, rows) = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    build_dataset(&headers, &rows)
}

/// Shared tail of every format: schema check → normalization → indexing.
///
/// A missing required column aborts the whole load with
/// [`schema::SchemaError`]; rows that fail date reconstruction are dropped
/// individually and only counted.
pub fn build_dataset(headers: &[String], rows: &[RawRow]) -> Result<(CrashDataset, LoadReport)> {
    schema::validate_columns(headers)?;

    for column in schema::absent_optional_columns(headers) {
        log::warn!("column '{column}' is absent; the field will be empty on every record");
    }

    let (records, dropped) = normalize::normalize_rows(rows);
    let report = LoadReport {
        rows_read: rows.len(),
        rows_kept: records.len(),
        rows_dropped: dropped,
    };

    if report.rows_dropped > 0 {
        log::warn!(
            "dropped {} of {} rows with no reconstructible date",
            report.rows_dropped,
            report.rows_read
        );
    }
    log::info!("loaded {} accident records", report.rows_kept);

    Ok((CrashDataset::from_records(records), report))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: a header row naming the columns, one accident per row.
/// Cell types are guessed: empty → null, then integer, float, bool, text.
fn load_csv(path: &Path) -> Result<(Vec<String>, Vec<RawRow>)> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut row = RawRow::new();
        for (col_idx, value) in record.iter().enumerate() {
            if let Some(name) = headers.get(col_idx) {
                row.insert(name.clone(), guess_cell_type(value));
            }
        }
        rows.push(row);
    }

    Ok((headers, rows))
}

fn guess_cell_type(s: &str) -> RawValue {
    if s.is_empty() {
        return RawValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return RawValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return RawValue::Float(f);
    }
    if s == "true" || s == "false" {
        return RawValue::Bool(s == "true");
    }
    RawValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Year": 1972,
///     "Month": "December",
///     "Day": 3,
///     "Operator": "Spantax",
///     "Fatalities (air)": 155
///   },
///   ...
/// ]
/// ```
///
/// The header list is the union of keys across all rows.
fn load_json(path: &Path) -> Result<(Vec<String>, Vec<RawRow>)> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: BTreeSet<String> = BTreeSet::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = RawRow::new();
        for (key, val) in obj {
            columns.insert(key.clone());
            row.insert(key.clone(), json_to_raw(val));
        }
        rows.push(row);
    }

    Ok((columns.into_iter().collect(), rows))
}

fn json_to_raw(val: &JsonValue) -> RawValue {
    match val {
        JsonValue::String(s) => RawValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                RawValue::Float(f)
            } else {
                RawValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => RawValue::Bool(*b),
        JsonValue::Null => RawValue::Null,
        other => RawValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of accident records.
///
/// Expected schema: one flat scalar column per dataset column (strings,
/// ints, floats, bools; nulls where data is missing).  Works with files
/// written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<(Vec<String>, Vec<RawRow>)> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if headers.is_empty() {
            headers = schema.fields().iter().map(|f| f.name().clone()).collect();
        }

        for row_no in 0..batch.num_rows() {
            let mut row = RawRow::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row_no);
                row.insert(field.name().clone(), value);
            }
            rows.push(row);
        }
    }

    Ok((headers, rows))
}

/// Extract a single cell from an Arrow column at a given row.  Column types
/// outside the supported scalar set read as missing.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> RawValue {
    if col.is_null(row) {
        return RawValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                RawValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                RawValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            RawValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            RawValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            RawValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            RawValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            RawValue::Bool(arr.value(row))
        }
        _ => RawValue::Null,
    }
}
