//! CSV loading for the daily climate dataset.
//!
//! The expected layout is a header row followed by one row per day:
//!
//! ```text
//! Date,Temperature,Precipitation
//! 1989-01-01,3.4,0.0
//! 1989-01-02,,1.2
//! ```
//!
//! `Temperature` may be replaced by a `Temperature_Min`/`Temperature_Max`
//! pair, in which case the daily temperature is their mean. Empty cells are
//! missing observations. Any other column is ignored.

use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::error::{DataFormatError, LoadError};
use crate::models::{ClimateRecord, ClimateTable};

pub const DATE_COLUMN: &str = "Date";
pub const TEMPERATURE_COLUMN: &str = "Temperature";
pub const TEMPERATURE_MIN_COLUMN: &str = "Temperature_Min";
pub const TEMPERATURE_MAX_COLUMN: &str = "Temperature_Max";
pub const PRECIPITATION_COLUMN: &str = "Precipitation";

/// Where the daily temperature comes from in a given file.
#[derive(Debug, Clone, Copy)]
enum TemperatureSource {
    Mean(usize),
    MinMax { min: usize, max: usize },
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    temperature: TemperatureSource,
    precipitation: usize,
}

/// Load the dataset from a CSV file on disk.
pub fn load_csv(path: impl AsRef<Path>) -> Result<ClimateTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let table = from_reader(file)?;
    tracing::info!(
        "Loaded {} daily records from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Parse the dataset from any reader. Records are returned sorted by date.
///
/// The input is buffered whole so that errors can name the file line a row
/// starts on, which differs from the record index once blank lines or quoted
/// newlines appear.
pub fn from_reader<R: Read>(mut reader: R) -> Result<ClimateTable, DataFormatError> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input).map_err(csv::Error::from)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_slice());

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut lines = LineTracker::new(&input);
    let mut seen: HashMap<NaiveDate, usize> = HashMap::new();
    let mut records = Vec::new();
    let mut row = StringRecord::new();

    loop {
        let offset = reader.position().byte() as usize;
        if !reader.read_record(&mut row)? {
            break;
        }
        let line = lines.line_of_record(offset);
        let record = parse_row(&row, &columns, line)?;

        if seen.insert(record.date, line).is_some() {
            return Err(DataFormatError::DuplicateDate {
                line,
                date: record.date,
            });
        }
        records.push(record);
    }

    records.sort_by_key(|r| r.date);
    Ok(ClimateTable::from_checked(records))
}

/// Maps byte offsets of records to 1-based file lines.
///
/// Offsets must be requested in increasing order.
struct LineTracker<'a> {
    input: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineTracker<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
        }
    }

    /// Line of the record whose read began at `offset`. The reader skips
    /// blank lines before a record, so those are skipped here too.
    fn line_of_record(&mut self, offset: usize) -> usize {
        let offset = offset.clamp(self.offset, self.input.len());
        let start = offset
            + self.input[offset..]
                .iter()
                .take_while(|b| matches!(b, b'\n' | b'\r'))
                .count();
        self.line += self.input[self.offset..start]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.offset = start;
        self.line
    }
}

fn resolve_columns(headers: &StringRecord) -> Result<Columns, DataFormatError> {
    let header_map: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect();

    let require = |name: &str| {
        header_map
            .get(name)
            .copied()
            .ok_or_else(|| DataFormatError::MissingColumn(name.to_string()))
    };

    let date = require(DATE_COLUMN)?;
    let precipitation = require(PRECIPITATION_COLUMN)?;
    let temperature = match header_map.get(TEMPERATURE_COLUMN) {
        Some(&idx) => TemperatureSource::Mean(idx),
        None => match (
            header_map.get(TEMPERATURE_MIN_COLUMN),
            header_map.get(TEMPERATURE_MAX_COLUMN),
        ) {
            (Some(&min), Some(&max)) => TemperatureSource::MinMax { min, max },
            _ => {
                return Err(DataFormatError::MissingColumn(
                    TEMPERATURE_COLUMN.to_string(),
                ))
            }
        },
    };

    Ok(Columns {
        date,
        temperature,
        precipitation,
    })
}

/// Spreadsheet exports often prefix the first header with a UTF-8 BOM.
fn normalize_header_name(name: &str) -> &str {
    name.trim().trim_start_matches('\u{feff}')
}

fn parse_row(
    row: &StringRecord,
    columns: &Columns,
    line: usize,
) -> Result<ClimateRecord, DataFormatError> {
    let raw_date = row.get(columns.date).unwrap_or_default();
    let date = parse_date(raw_date).ok_or_else(|| DataFormatError::InvalidDate {
        line,
        value: raw_date.to_string(),
    })?;

    let temperature = match columns.temperature {
        TemperatureSource::Mean(idx) => parse_number(row, idx, TEMPERATURE_COLUMN, line)?,
        TemperatureSource::MinMax { min, max } => {
            let min = parse_number(row, min, TEMPERATURE_MIN_COLUMN, line)?;
            let max = parse_number(row, max, TEMPERATURE_MAX_COLUMN, line)?;
            match (min, max) {
                (Some(min), Some(max)) => Some((min + max) / 2.0),
                _ => None,
            }
        }
    };
    let precipitation = parse_number(row, columns.precipitation, PRECIPITATION_COLUMN, line)?;

    Ok(ClimateRecord::new(date, temperature, precipitation))
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time which is discarded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
                .ok()
                .map(|dt| dt.date())
        })
}

fn parse_number(
    row: &StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> Result<Option<f64>, DataFormatError> {
    let raw = row.get(idx).unwrap_or_default();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(DataFormatError::InvalidNumber {
            line,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}
