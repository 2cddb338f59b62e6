use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{columns, Dataset, Event};

/// One row as text cells, ordered like [`columns::REQUIRED`].
type Cells<'a> = [Option<&'a str>; 8];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an event dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated text, ISO-8859-1
/// * `.tsv`          – tab-separated text, ISO-8859-1
/// * `.json`         – `[{ "date": ..., "mag": ..., ... }, ...]`
/// * `.parquet`      – flat table with the required columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, b','),
        "tsv" => load_delimited(path, b'\t'),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} events from {} ({} continents, {} countries)",
        dataset.len(),
        path.display(),
        dataset.continents.len(),
        dataset.countries.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset> {
    let bytes = std::fs::read(path).context("reading file")?;
    parse_delimited(&bytes, delimiter)
}

/// Parse an ISO-8859-1 delimited table with a header row.
pub fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<Dataset> {
    let text = decode_latin1(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let index = resolve_columns(&headers)?;

    let mut events = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.with_context(|| format!("reading row {row}"))?;
        let cells: Cells = index.map(|col| record.get(col).filter(|s| !s.is_empty()));
        events.push(event_from_cells(row, cells)?);
    }

    Ok(Dataset::from_events(events))
}

/// ISO-8859-1 maps every byte to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Map each required column to its header position, or list what is absent.
fn resolve_columns(headers: &[String]) -> Result<[usize; 8], DataError> {
    let mut missing = Vec::new();
    let mut index = [0usize; 8];
    for (slot, name) in index.iter_mut().zip(columns::REQUIRED) {
        match headers.iter().position(|h| h == name) {
            Some(pos) => *slot = pos,
            None => missing.push(name.to_string()),
        }
    }
    if missing.is_empty() {
        Ok(index)
    } else {
        Err(DataError::MissingColumns(missing))
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "date": "2020-01-01", "mag": 7.2, "depth": 10.0, "latitude": 35.1,
///     "longitude": 139.2, "country": "Japan", "continent": "Asia", "id": "us1" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut missing: Vec<String> = Vec::new();
    for rec in records {
        let obj = rec.as_object().context("Expected an array of JSON objects")?;
        for name in columns::REQUIRED {
            if !obj.contains_key(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
    }
    if !missing.is_empty() {
        return Err(DataError::MissingColumns(missing).into());
    }

    let mut events = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let owned: [Option<String>; 8] =
            columns::REQUIRED.map(|name| rec.get(name).and_then(json_cell));
        let cells: Cells = std::array::from_fn(|c| owned[c].as_deref());
        events.push(event_from_cells(i + 1, cells)?);
    }

    Ok(Dataset::from_events(events))
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) if s.trim().is_empty() => None,
        JsonValue::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing one event per row.
///
/// Column types are normalised by casting to Utf8 first, so numeric ids,
/// `Date32` dates and timestamps all go through the same cell parser.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let field_names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    resolve_columns(&field_names)?;

    let reader = builder.build().context("building parquet reader")?;

    let mut events = Vec::new();
    let mut row_offset = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let mut text_columns: Vec<StringArray> = Vec::with_capacity(8);
        for name in columns::REQUIRED {
            let idx = batch
                .schema()
                .index_of(name)
                .map_err(|_| DataError::MissingColumns(vec![name.to_string()]))?;
            let as_text = cast(batch.column(idx).as_ref(), &DataType::Utf8)
                .with_context(|| format!("column '{name}' cannot be read as text"))?;
            let strings = as_text
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray after cast")?
                .clone();
            text_columns.push(strings);
        }

        for r in 0..batch.num_rows() {
            let cells: Cells = std::array::from_fn(|c| {
                let col = &text_columns[c];
                if col.is_null(r) {
                    None
                } else {
                    Some(col.value(r).trim()).filter(|s| !s.is_empty())
                }
            });
            events.push(event_from_cells(row_offset + r + 1, cells)?);
        }
        row_offset += batch.num_rows();
    }

    Ok(Dataset::from_events(events))
}

// ---------------------------------------------------------------------------
// Cell parsing shared by all loaders
// ---------------------------------------------------------------------------

fn event_from_cells(row: usize, cells: Cells) -> Result<Event, DataError> {
    let [date, mag, depth, lat, lon, country, continent, id] = cells;

    let text = |cell: Option<&str>, column: &str| {
        cell.map(str::to_string).ok_or_else(|| DataError::MissingValue {
            row,
            column: column.to_string(),
        })
    };
    let number = |cell: Option<&str>, column: &str| -> Result<f64, DataError> {
        let raw = cell.ok_or_else(|| DataError::MissingValue {
            row,
            column: column.to_string(),
        })?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DataError::InvalidNumber {
                row,
                column: column.to_string(),
                value: raw.to_string(),
            })
    };

    let raw_date = text(date, columns::DATE)?;
    let date = parse_date(&raw_date).ok_or(DataError::InvalidDate {
        row,
        value: raw_date,
    })?;

    Ok(Event {
        id: text(id, columns::ID)?,
        date,
        latitude: number(lat, columns::LATITUDE)?,
        longitude: number(lon, columns::LONGITUDE)?,
        magnitude: number(mag, columns::MAGNITUDE)?,
        depth: number(depth, columns::DEPTH)?,
        country: text(country, columns::COUNTRY)?,
        continent: text(continent, columns::CONTINENT)?,
    })
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse the date forms found in exported earthquake catalogues, keeping only
/// the calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z")
                .ok()
                .map(|dt| dt.date_naive())
        })
}
