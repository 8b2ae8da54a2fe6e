use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crashdash::data::schema::{
    COL_COUNTRY, COL_DAY, COL_FATALITIES_AIR, COL_FATALITIES_GROUND, COL_MANUFACTURER, COL_MONTH,
    COL_OPERATOR, COL_YEAR,
};
use crashdash::load_file;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform draw in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// One-in-`n` coin.
    fn chance(&mut self, n: u64) -> bool {
        self.below(n) == 0
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const COUNTRIES: [&str; 8] = [
    "USA",
    "Brazil",
    "France",
    "India",
    "Russia",
    "Canada",
    "Indonesia",
    "Colombia",
];

const OPERATORS: [&str; 8] = [
    "Aeroflot",
    "Pan Am",
    "Air France",
    "TWA",
    "Lufthansa",
    "VARIG",
    "KLM",
    "United Air Lines",
];

const MANUFACTURERS: [&str; 6] = [
    "Douglas",
    "Boeing",
    "Lockheed",
    "Antonov",
    "Airbus",
    "de Havilland",
];

struct SampleRow {
    year: i64,
    month: String,
    day: Option<i64>,
    country: Option<&'static str>,
    operator: Option<&'static str>,
    manufacturer: Option<&'static str>,
    fatalities_air: Option<i64>,
    fatalities_ground: Option<i64>,
}

/// Generate `count` synthetic accident rows with the kinds of dirt the real
/// dataset has: missing days, numeric and unmapped month cells, absent
/// countries and fatality counts.  A few rows at the end can never form a
/// real calendar date, so the cleaner always has something to drop.
fn generate_rows(count: usize, rng: &mut SimpleRng) -> Vec<SampleRow> {
    let mut rows = Vec::with_capacity(count + 2);

    for _ in 0..count {
        let month = if rng.chance(20) {
            // Numeric month cell – the cleaner takes 1..=12 as-is.
            (1 + rng.below(12)).to_string()
        } else if rng.chance(40) {
            // Unmapped month name – row gets dropped.
            "Sometime".to_string()
        } else {
            MONTH_NAMES[rng.below(12) as usize].to_string()
        };

        rows.push(SampleRow {
            year: 1930 + rng.below(95) as i64,
            month,
            day: if rng.chance(25) {
                None
            } else {
                Some(1 + rng.below(28) as i64)
            },
            country: if rng.chance(20) {
                None
            } else {
                Some(COUNTRIES[rng.below(8) as usize])
            },
            operator: if rng.chance(25) {
                None
            } else {
                Some(OPERATORS[rng.below(8) as usize])
            },
            manufacturer: Some(MANUFACTURERS[rng.below(6) as usize]),
            fatalities_air: if rng.chance(10) {
                None
            } else {
                Some(rng.below(300) as i64)
            },
            fatalities_ground: if rng.chance(6) {
                None
            } else {
                Some(rng.below(12) as i64)
            },
        });
    }

    // Impossible calendar dates.
    rows.push(SampleRow {
        year: 1990,
        month: "February".to_string(),
        day: Some(30),
        country: Some("USA"),
        operator: Some("TWA"),
        manufacturer: Some("Boeing"),
        fatalities_air: Some(3),
        fatalities_ground: Some(0),
    });
    rows.push(SampleRow {
        year: 1984,
        month: "April".to_string(),
        day: Some(31),
        country: Some("France"),
        operator: Some("Air France"),
        manufacturer: Some("Airbus"),
        fatalities_air: None,
        fatalities_ground: Some(1),
    });

    rows
}

fn write_csv(path: &str, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    writer.write_record([
        COL_YEAR,
        COL_MONTH,
        COL_DAY,
        COL_COUNTRY,
        COL_OPERATOR,
        COL_MANUFACTURER,
        COL_FATALITIES_AIR,
        COL_FATALITIES_GROUND,
    ])?;

    let number = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();
    for row in rows {
        writer.write_record([
            row.year.to_string(),
            row.month.clone(),
            number(row.day),
            row.country.unwrap_or_default().to_string(),
            row.operator.unwrap_or_default().to_string(),
            row.manufacturer.unwrap_or_default().to_string(),
            number(row.fatalities_air),
            number(row.fatalities_ground),
        ])?;
    }

    writer.flush().with_context(|| format!("flushing {path}"))?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[SampleRow]) -> Result<()> {
    let years = Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>());
    let months = StringArray::from(rows.iter().map(|r| r.month.as_str()).collect::<Vec<_>>());
    let days = Int64Array::from(rows.iter().map(|r| r.day).collect::<Vec<_>>());
    let countries = StringArray::from(rows.iter().map(|r| r.country).collect::<Vec<_>>());
    let operators = StringArray::from(rows.iter().map(|r| r.operator).collect::<Vec<_>>());
    let manufacturers =
        StringArray::from(rows.iter().map(|r| r.manufacturer).collect::<Vec<_>>());
    let fatalities_air =
        Int64Array::from(rows.iter().map(|r| r.fatalities_air).collect::<Vec<_>>());
    let fatalities_ground =
        Int64Array::from(rows.iter().map(|r| r.fatalities_ground).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_YEAR, DataType::Int64, false),
        Field::new(COL_MONTH, DataType::Utf8, false),
        Field::new(COL_DAY, DataType::Int64, true),
        Field::new(COL_COUNTRY, DataType::Utf8, true),
        Field::new(COL_OPERATOR, DataType::Utf8, true),
        Field::new(COL_MANUFACTURER, DataType::Utf8, true),
        Field::new(COL_FATALITIES_AIR, DataType::Int64, true),
        Field::new(COL_FATALITIES_GROUND, DataType::Int64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(years),
            Arc::new(months),
            Arc::new(days),
            Arc::new(countries),
            Arc::new(operators),
            Arc::new(manufacturers),
            Arc::new(fatalities_air),
            Arc::new(fatalities_ground),
        ],
    )
    .context("assembling record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(500, &mut rng);

    write_csv("sample_data.csv", &rows)?;
    write_parquet("sample_data.parquet", &rows)?;

    // Round-trip both files through the engine as a smoke check.
    for path in ["sample_data.csv", "sample_data.parquet"] {
        let (dataset, report) = load_file(Path::new(path))?;
        println!(
            "{path}: kept {} of {} rows ({} dropped), years {:?}, {} countries, {} operators",
            report.rows_kept,
            report.rows_read,
            report.rows_dropped,
            dataset.year_bounds,
            dataset.countries.len(),
            dataset.operators.len(),
        );
    }

    Ok(())
}
