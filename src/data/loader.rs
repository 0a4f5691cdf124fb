use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::value::RawValue;

use super::error::DataError;
use super::model::{
    COL_D, COL_DOLLARS, COL_L3, COL_L5, COL_L9, COL_PR, COL_UNITS, COL_UPC, COL_VEND, COL_WEEK,
    REQUIRED_COLUMNS, SalesRow, SalesTable, Week,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the chart-data column names (primary)
/// * `.json`    – `[{ "UPC": "...", "first(VEND)": 28400, ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// Missing columns fail with [`DataError::MissingColumn`]; products whose
/// attributes vary between rows fail with [`DataError::InconsistentProduct`].
pub fn load_file(path: &Path) -> Result<SalesTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let table = SalesTable::new(rows)
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(table)
}

// ---------------------------------------------------------------------------
// Cells – source text of each required column before conversion
// ---------------------------------------------------------------------------

/// Trimmed cell text; blank cells are `None`.
type Cell = Option<String>;

fn cell(raw: &str) -> Cell {
    let s = raw.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Convert the ten required cells (in [`REQUIRED_COLUMNS`] order) to a row.
///
/// Text columns keep the source text unchanged; only vendor, week and the
/// measures are parsed.
fn build_row(row_no: usize, cells: [Cell; 10]) -> Result<SalesRow, DataError> {
    let [upc, vend, l3, l5, l9, week, dollars, units, pr, d] = cells;

    let invalid = |column: &str, value: &str| DataError::InvalidValue {
        row: row_no,
        column: column.to_string(),
        value: value.to_string(),
    };

    let text = |column: &str, cell: Cell| cell.ok_or_else(|| invalid(column, ""));

    let number = |column: &str, cell: Cell| -> Result<f64, DataError> {
        match cell {
            None => Ok(f64::NAN),
            Some(s) => s.parse::<f64>().map_err(|_| invalid(column, &s)),
        }
    };

    let vend = text(COL_VEND, vend)?;
    let vendor = match vend.parse::<i64>() {
        Ok(code) => code,
        // Dataframe exports may write integer codes as `28400.0`.
        Err(_) => match vend.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
            _ => return Err(invalid(COL_VEND, &vend)),
        },
    };

    Ok(SalesRow {
        upc: text(COL_UPC, upc)?,
        vendor,
        parent: text(COL_L3, l3)?,
        brand: text(COL_L5, l5)?,
        description: text(COL_L9, l9)?,
        week: Week::parse(&text(COL_WEEK, week)?),
        dollars: number(COL_DOLLARS, dollars)?,
        units: number(COL_UNITS, units)?,
        pr: number(COL_PR, pr)?,
        d: number(COL_D, d)?,
    })
}

/// Locate every required column, failing on the first one absent.
fn required_indices(
    mut lookup: impl FnMut(&str) -> Option<usize>,
) -> Result<[usize; 10], DataError> {
    let mut indices = [0usize; 10];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = lookup(name).ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
    }
    Ok(indices)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one row per (product, week).
/// Extra columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<SalesRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let indices = required_indices(|name| headers.iter().position(|h| h == name))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = indices.map(|idx| cell(record.get(idx).unwrap_or("")));
        rows.push(build_row(row_no, cells)?);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
///
/// Values are read as raw JSON so numeric product codes keep their digits.
fn load_json(path: &Path) -> Result<Vec<SalesRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<HashMap<String, Box<RawValue>>> =
        serde_json::from_str(&text).context("parsing JSON records")?;

    // Without a record there are no columns at all.
    if records.is_empty() {
        return Err(DataError::MissingColumn(REQUIRED_COLUMNS[0].to_string()).into());
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let mut cells: [Cell; 10] = Default::default();
        for (slot, name) in cells.iter_mut().zip(REQUIRED_COLUMNS) {
            let value = rec
                .get(name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
            *slot = json_cell(value).with_context(|| format!("Row {i}, column '{name}'"))?;
        }
        rows.push(build_row(i, cells)?);
    }

    Ok(rows)
}

fn json_cell(value: &RawValue) -> Result<Cell> {
    let raw = value.get().trim();
    if raw == "null" {
        return Ok(None);
    }
    if raw.starts_with('"') {
        let s: String = serde_json::from_str(raw)?;
        return Ok(cell(&s));
    }
    Ok(cell(raw))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns named like the CSV header.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Any column type Arrow can render as
/// text is accepted; dates become week labels such as `2011-01-26`.
fn load_parquet(path: &Path) -> Result<Vec<SalesRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let indices = parquet_indices(builder.schema())?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = text_columns(&batch, &indices, rows.len())?;

        for row in 0..batch.num_rows() {
            let cells: [Cell; 10] = std::array::from_fn(|c| {
                let col = &columns[c];
                if col.is_null(row) {
                    None
                } else {
                    cell(col.value(row))
                }
            });
            rows.push(build_row(rows.len(), cells)?);
        }
    }

    Ok(rows)
}

fn parquet_indices(schema: &Schema) -> Result<[usize; 10], DataError> {
    required_indices(|name| schema.index_of(name).ok())
}

/// Render each required column of a batch as UTF-8 text.
fn text_columns(
    batch: &RecordBatch,
    indices: &[usize; 10],
    first_row: usize,
) -> Result<Vec<StringArray>, DataError> {
    indices
        .iter()
        .zip(REQUIRED_COLUMNS)
        .map(|(&idx, name)| -> Result<StringArray, DataError> {
            let col = batch.column(idx);
            let text = cast(col, &DataType::Utf8).map_err(|_| DataError::InvalidValue {
                row: first_row,
                column: name.to_string(),
                value: col.data_type().to_string(),
            })?;
            Ok(text.as_string::<i32>().clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array};
    use parquet::arrow::ArrowWriter;
    use tempfile::Builder;

    use super::*;
    use crate::data::filter::distinct_identifiers;

    const HEADER: &str =
        "UPC,first(VEND),first(L3),first(L5),first(L9),WEEK,sum(DOLLARS),sum(UNITS),avg(PR),avg(D)";

    fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut tmp = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(tmp, "{body}").unwrap();
        tmp
    }

    #[test]
    fn loads_csv_rows_in_order() {
        let csv = format!(
            "{HEADER}\n\
             00-01-28400-03875,28400,PEPSICO INC,LAYS,LAYS CLASSIC,1582,100.5,10,0.5,0.1\n\
             00-01-28400-03875,28400,PEPSICO INC,LAYS,LAYS CLASSIC,1583,200,20,0.6,0.2\n\
             00-02-11111-00001,11111,KELLOGG,PRINGLES,ORIGINAL,1582,50,5,,0\n"
        );
        let tmp = write_temp(".csv", &csv);
        let table = load_file(tmp.path()).unwrap();

        assert_eq!(table.len(), 3);
        let first = &table.rows()[0];
        assert_eq!(first.upc, "00-01-28400-03875");
        assert_eq!(first.vendor, 28400);
        assert_eq!(first.week, Week::Ordinal(1582));
        assert_eq!(first.dollars, 100.5);
        assert_eq!(first.units, 10.0);
        assert!(table.rows()[2].pr.is_nan());
    }

    #[test]
    fn csv_extra_columns_are_ignored() {
        let csv = format!("extra,{HEADER}\nx,A,99999,P,B,D,2011-01-03,1,2,3,4\n");
        let tmp = write_temp(".csv", &csv);
        let table = load_file(tmp.path()).unwrap();
        assert_eq!(table.rows()[0].week, Week::Label("2011-01-03".into()));
        assert_eq!(table.rows()[0].d, 4.0);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let tmp = write_temp(".csv", "UPC,first(VEND),WEEK\nA,28400,1\n");
        let err = load_file(tmp.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumn("first(L3)".into()))
        );
    }

    #[test]
    fn csv_bad_vendor_code_is_reported() {
        let csv = format!("{HEADER}\nA,pepsi,P,B,D,1,1,1,1,1\n");
        let tmp = write_temp(".csv", &csv);
        let err = load_file(tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn inconsistent_product_fails_validation() {
        let csv = format!(
            "{HEADER}\n\
             A,28400,P,LAYS,D,1,1,1,1,1\n\
             A,28400,P,RUFFLES,D,2,1,1,1,1\n"
        );
        let tmp = write_temp(".csv", &csv);
        let err = load_file(tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InconsistentProduct { .. })
        ));
    }

    #[test]
    fn loads_json_records() {
        let json = r#"[
            {"UPC": "A", "first(VEND)": 30000, "first(L3)": "P", "first(L5)": "B",
             "first(L9)": "D", "WEEK": 3, "sum(DOLLARS)": 12.5, "sum(UNITS)": 2,
             "avg(PR)": 0.25, "avg(D)": null}
        ]"#;
        let tmp = write_temp(".json", json);
        let table = load_file(tmp.path()).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row.vendor, 30000);
        assert_eq!(row.week, Week::Ordinal(3));
        assert_eq!(row.units, 2.0);
        assert!(row.d.is_nan());
    }

    #[test]
    fn json_missing_column_is_reported() {
        let tmp = write_temp(".json", r#"[{"UPC": "A"}]"#);
        let err = load_file(tmp.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumn("first(VEND)".into()))
        );
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let tmp = write_temp(".xlsx", "");
        assert!(load_file(tmp.path()).is_err());
    }

    #[test]
    fn csv_text_columns_keep_source_text() {
        let csv = format!(
            "{HEADER}\n\
             123456789012345678901,28400,P,Infinity,1E3,1,1,1,1,1\n\
             123456789012345678902,11111,NaN,LAYS,007,1,1,1,1,1\n"
        );
        let tmp = write_temp(".csv", &csv);
        let table = load_file(tmp.path()).unwrap();

        let first = &table.rows()[0];
        assert_eq!(first.upc, "123456789012345678901");
        assert_eq!(first.brand, "Infinity");
        assert_eq!(first.description, "1E3");
        let second = &table.rows()[1];
        assert_eq!(second.upc, "123456789012345678902");
        assert_eq!(second.parent, "NaN");
        assert_eq!(second.description, "007");
        assert_eq!(
            distinct_identifiers(&table),
            vec!["123456789012345678901", "123456789012345678902"]
        );
    }

    #[test]
    fn csv_float_vendor_code_is_accepted() {
        let csv = format!("{HEADER}\nA,28400.0,P,B,D,1,1,1,1,1\n");
        let tmp = write_temp(".csv", &csv);
        let table = load_file(tmp.path()).unwrap();
        assert_eq!(table.rows()[0].vendor, 28400);
    }

    #[test]
    fn json_numeric_codes_keep_their_digits() {
        let json = r#"[
            {"UPC": 123456789012345678901, "first(VEND)": 28400, "first(L3)": "P",
             "first(L5)": "Infinity", "first(L9)": "D", "WEEK": 1, "sum(DOLLARS)": 1,
             "sum(UNITS)": 1, "avg(PR)": 1, "avg(D)": 1},
            {"UPC": 123456789012345678902, "first(VEND)": 28400, "first(L3)": "P",
             "first(L5)": "B", "first(L9)": "D", "WEEK": 1, "sum(DOLLARS)": 1,
             "sum(UNITS)": 1, "avg(PR)": 1, "avg(D)": 1}
        ]"#;
        let tmp = write_temp(".json", json);
        let table = load_file(tmp.path()).unwrap();
        assert_eq!(table.rows()[0].upc, "123456789012345678901");
        assert_eq!(table.rows()[0].brand, "Infinity");
        assert_eq!(table.rows()[1].upc, "123456789012345678902");
    }

    #[test]
    fn empty_json_array_reports_missing_column() {
        let tmp = write_temp(".json", "[]");
        let err = load_file(tmp.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumn("UPC".into()))
        );
    }

    // -- Parquet --

    fn write_parquet(batch: &RecordBatch) -> tempfile::NamedTempFile {
        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let file = tmp.reopen().unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        tmp
    }

    fn chart_batch(week: ArrayRef) -> RecordBatch {
        let text = |v: [&str; 2]| -> ArrayRef { Arc::new(StringArray::from(v.to_vec())) };
        let float = |v: [Option<f64>; 2]| -> ArrayRef { Arc::new(Float64Array::from(v.to_vec())) };
        RecordBatch::try_from_iter(vec![
            ("UPC", text(["A", "A"])),
            ("first(VEND)", Arc::new(Int64Array::from(vec![28400, 28400])) as ArrayRef),
            ("first(L3)", text(["FRITO LAY", "FRITO LAY"])),
            ("first(L5)", text(["Infinity", "Infinity"])),
            ("first(L9)", text(["LAYS CLASSIC", "LAYS CLASSIC"])),
            ("WEEK", week),
            ("sum(DOLLARS)", float([Some(100.5), Some(200.0)])),
            ("sum(UNITS)", float([Some(10.0), Some(20.0)])),
            ("avg(PR)", float([Some(0.5), None])),
            ("avg(D)", float([Some(0.1), Some(0.2)])),
        ])
        .unwrap()
    }

    #[test]
    fn loads_parquet_columns() {
        let batch = chart_batch(Arc::new(Int64Array::from(vec![1582, 1583])));
        let tmp = write_parquet(&batch);
        let table = load_file(tmp.path()).unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.upc, "A");
        assert_eq!(first.vendor, 28400);
        assert_eq!(first.parent, "FRITO LAY");
        assert_eq!(first.brand, "Infinity");
        assert_eq!(first.week, Week::Ordinal(1582));
        assert_eq!(first.dollars, 100.5);
        assert_eq!(first.pr, 0.5);
        assert_eq!(table.rows()[1].units, 20.0);
        assert!(table.rows()[1].pr.is_nan());
    }

    #[test]
    fn parquet_date_weeks_become_labels() {
        let batch = chart_batch(Arc::new(Date32Array::from(vec![15000, 15007])));
        let tmp = write_parquet(&batch);
        let table = load_file(tmp.path()).unwrap();
        let weeks: Vec<Week> = table.rows().iter().map(|r| r.week.clone()).collect();
        assert_eq!(
            weeks,
            vec![
                Week::Label("2011-01-26".into()),
                Week::Label("2011-02-02".into())
            ]
        );
    }

    #[test]
    fn parquet_missing_column_is_reported_without_rows() {
        let schema = Arc::new(arrow::datatypes::Schema::new(vec![
            arrow::datatypes::Field::new("UPC", DataType::Utf8, false),
        ]));
        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.close().unwrap();

        let err = load_file(tmp.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumn("first(VEND)".into()))
        );
    }
}
