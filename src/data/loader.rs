use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma separated, header row first
/// * `.tsv`          – tab separated, header row first
/// * `.json`         – `[{ "time": 1, "pressure": 5.2, ... }, ...]`
/// * `.parquet`      – flat scalar columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => load_csv(path, b',')?,
        "tsv" => load_csv(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    if dataset.is_empty() {
        bail!("No data found in {}", path.display());
    }
    log::debug!(
        "{}: {} rows, columns {:?}",
        path.display(),
        dataset.len(),
        dataset.column_names
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names, then one record per line.
///
/// Cells are typed on the fly (see [`parse_cell`]).  Records carrying fewer
/// than two fields are dropped, which also discards stray trailer lines.
fn load_csv(path: &Path, delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), parse_cell(value)))
            .collect();

        if row.len() < 2 {
            dropped += 1;
            continue;
        }
        rows.push(row);
    }

    if dropped > 0 {
        log::warn!("{}: skipped {dropped} short record(s)", path.display());
    }
    Ok(Dataset::from_rows(&headers, rows))
}

/// Type a raw CSV field.
///
/// Empty → `Null`, `true`/`TRUE`/`false`/`FALSE` → `Bool`, a plain decimal
/// literal → `Number`, anything else stays text.
pub fn parse_cell(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    match s {
        "true" | "TRUE" => return CellValue::Bool(true),
        "false" | "FALSE" => return CellValue::Bool(false),
        _ => {}
    }
    if is_decimal_literal(s) {
        if let Ok(v) = s.trim().parse::<f64>() {
            return CellValue::Number(v);
        }
    }
    CellValue::Text(s.to_string())
}

/// `-?(digits[.digits] | .digits)([eE][+-]?digits)?`, surrounding whitespace allowed.
///
/// Rejects what `f64::from_str` would otherwise accept, e.g. `inf`, `NaN`, `+5`.
fn is_decimal_literal(s: &str) -> bool {
    let s = s.trim();
    let s = s.strip_prefix('-').unwrap_or(s);

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
        return false;
    }
    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "time": 1, "pressure": 5.2, "flow (R)": 2 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut header: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        if i == 0 {
            header = obj.keys().cloned().collect();
        }
        rows.push(
            obj.iter()
                .map(|(key, val)| (key.clone(), json_to_cell(val)))
                .collect(),
        );
    }

    Ok(Dataset::from_rows(&header, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::Text(n.to_string()),
        },
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let header: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let record: Record = schema
                .fields()
                .iter()
                .zip(batch.columns())
                .map(|(field, col)| (field.name().clone(), extract_cell(col, row)))
                .collect();
            rows.push(record);
        }
    }

    Ok(Dataset::from_rows(&header, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => CellValue::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => {
            CellValue::Number(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => CellValue::Text(format!("{other:?}")),
    }
}
