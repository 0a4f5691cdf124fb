use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// First IRI week of 2011.
const FIRST_WEEK: i64 = 1583;
const WEEKS: i64 = 52;

/// One exported chart-data row; field names match the loader's columns.
#[derive(Debug, Serialize)]
struct ChartRow {
    #[serde(rename = "UPC")]
    upc: String,
    #[serde(rename = "first(VEND)")]
    vend: i64,
    #[serde(rename = "first(L3)")]
    l3: String,
    #[serde(rename = "first(L5)")]
    l5: String,
    #[serde(rename = "first(L9)")]
    l9: String,
    #[serde(rename = "WEEK")]
    week: i64,
    #[serde(rename = "sum(DOLLARS)")]
    dollars: f64,
    #[serde(rename = "sum(UNITS)")]
    units: f64,
    #[serde(rename = "avg(PR)")]
    pr: f64,
    #[serde(rename = "avg(D)")]
    d: f64,
}

struct Product {
    upc: &'static str,
    vend: i64,
    parent: &'static str,
    brand: &'static str,
    description: &'static str,
    weekly_dollars: f64,
    unit_price: f64,
}

const PRODUCTS: [Product; 6] = [
    Product {
        upc: "00-03-28400-03345",
        vend: 28400,
        parent: "FRITO LAY",
        brand: "LAYS",
        description: "LAYS CLASSIC POTATO CHIPS",
        weekly_dollars: 52_000.0,
        unit_price: 3.49,
    },
    Product {
        upc: "00-01-28400-03875",
        vend: 28400,
        parent: "FRITO LAY",
        brand: "DORITOS",
        description: "DORITOS NACHO CHEESE",
        weekly_dollars: 47_000.0,
        unit_price: 3.99,
    },
    Product {
        upc: "00-02-28400-06408",
        vend: 28400,
        parent: "FRITO LAY",
        brand: "CHEETOS",
        description: "CHEETOS CRUNCHY",
        weekly_dollars: 31_000.0,
        unit_price: 3.29,
    },
    Product {
        upc: "00-01-30000-01020",
        vend: 30000,
        parent: "QUAKER OATS",
        brand: "QUAKER",
        description: "QUAKER RICE CAKES",
        weekly_dollars: 12_000.0,
        unit_price: 2.79,
    },
    Product {
        upc: "00-01-38000-84510",
        vend: 38000,
        parent: "KELLOGG CO",
        brand: "PRINGLES",
        description: "PRINGLES ORIGINAL",
        weekly_dollars: 28_000.0,
        unit_price: 1.99,
    },
    Product {
        upc: "00-02-41780-00118",
        vend: 41780,
        parent: "UTZ QUALITY FOODS",
        brand: "UTZ",
        description: "UTZ RIPPLE CUT",
        weekly_dollars: 9_500.0,
        unit_price: 3.19,
    },
];

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<ChartRow> {
    let mut rows = Vec::with_capacity(PRODUCTS.len() * WEEKS as usize);
    for p in &PRODUCTS {
        for w in 0..WEEKS {
            // Price reductions lift sales; summer lifts snacks.
            let pr = (rng.next_f64() * 0.8).min(1.0);
            let d = (rng.next_f64() * 2.0).floor() * rng.next_f64();
            let season = 1.0 + 0.15 * (2.0 * std::f64::consts::PI * w as f64 / WEEKS as f64).sin();
            let lift = 1.0 + 0.4 * pr + 0.1 * d;
            let dollars = (p.weekly_dollars * season * lift + rng.gauss(0.0, p.weekly_dollars * 0.05))
                .max(0.0);
            let price = p.unit_price * (1.0 - 0.2 * pr);

            rows.push(ChartRow {
                upc: p.upc.to_string(),
                vend: p.vend,
                l3: p.parent.to_string(),
                l5: p.brand.to_string(),
                l9: p.description.to_string(),
                week: FIRST_WEEK + w,
                dollars: (dollars * 100.0).round() / 100.0,
                units: (dollars / price).round(),
                pr: (pr * 1000.0).round() / 1000.0,
                d: (d * 1000.0).round() / 1000.0,
            });
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[ChartRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[ChartRow]) -> Result<()> {
    let text = |f: fn(&ChartRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&ChartRow) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let int = |f: fn(&ChartRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("UPC", DataType::Utf8, false),
        Field::new("first(VEND)", DataType::Int64, false),
        Field::new("first(L3)", DataType::Utf8, false),
        Field::new("first(L5)", DataType::Utf8, false),
        Field::new("first(L9)", DataType::Utf8, false),
        Field::new("WEEK", DataType::Int64, false),
        Field::new("sum(DOLLARS)", DataType::Float64, false),
        Field::new("sum(UNITS)", DataType::Float64, false),
        Field::new("avg(PR)", DataType::Float64, false),
        Field::new("avg(D)", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.upc.as_str()),
            int(|r| r.vend),
            text(|r| r.l3.as_str()),
            text(|r| r.l5.as_str()),
            text(|r| r.l9.as_str()),
            int(|r| r.week),
            float(|r| r.dollars),
            float(|r| r.units),
            float(|r| r.pr),
            float(|r| r.d),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv("chart_data.csv", &rows)?;
    write_parquet("chart_data.parquet", &rows)?;

    println!(
        "Wrote {} rows ({} products × {WEEKS} weeks) to chart_data.csv and chart_data.parquet",
        rows.len(),
        PRODUCTS.len()
    );
    Ok(())
}
