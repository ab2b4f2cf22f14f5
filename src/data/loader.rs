use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{CityTimeSeriesStore, DatasetRow, StoreBuilder};
use crate::error::{Result, SeaLevelError};

/// Column names, in the positional order used by the CSV layout.
pub const COLUMNS: [&str; 6] = ["name", "country", "latitude", "longitude", "year", "sea_level_mm"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sea-level dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row (ignored) then positional columns
///   `name, country, latitude, longitude, year, sea_level_mm`
/// * `.json`    – `[{ "name": ..., "year": 2020, "sea_level_mm": 100.0, ... }, ...]`
/// * `.parquet` – the same six columns, located by name
///
/// A single malformed row aborts the load; no partial store is returned.
pub fn load_file(path: &Path) -> Result<CityTimeSeriesStore> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = File::open(path).map_err(|source| SeaLevelError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let builder = match ext.as_str() {
        "csv" => load_csv(file)?,
        "json" => load_json(path, file)?,
        "parquet" | "pq" => load_parquet(path, file)?,
        other => return Err(SeaLevelError::UnsupportedFormat(other.to_string())),
    };

    let rows = builder.rows();
    let store = builder.build();
    log::info!(
        "Loaded {} cities ({rows} rows) from {}",
        store.len(),
        path.display()
    );
    Ok(store)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(file: File) -> Result<StoreBuilder> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut builder = StoreBuilder::new();

    for (row_index, result) in reader.byte_records().enumerate() {
        let record = result.map_err(|e| SeaLevelError::malformed(row_index, "", e.to_string()))?;
        let row = parse_record(&record)
            .and_then(finite_row)
            .map_err(|reason| SeaLevelError::malformed(row_index, raw_line(&record), reason))?;
        builder.insert(row);
    }

    Ok(builder)
}

fn parse_record(record: &csv::ByteRecord) -> std::result::Result<DatasetRow, String> {
    let field = |idx: usize| text_field(record, idx);

    Ok(DatasetRow {
        name: field(0)?.trim().to_string(),
        country: field(1)?.trim().to_string(),
        latitude: parse_number(field(2)?, COLUMNS[2])?,
        longitude: parse_number(field(3)?, COLUMNS[3])?,
        year: parse_number(field(4)?, COLUMNS[4])?,
        sea_level_mm: parse_number(field(5)?, COLUMNS[5])?,
    })
}

fn text_field(record: &csv::ByteRecord, idx: usize) -> std::result::Result<&str, String> {
    let bytes = record
        .get(idx)
        .ok_or_else(|| format!("missing '{}' column", COLUMNS[idx]))?;
    std::str::from_utf8(bytes).map_err(|e| format!("'{}' is not valid UTF-8 ({e})", COLUMNS[idx]))
}

fn parse_number<T>(raw: &str, col: &str) -> std::result::Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| format!("'{col}': {raw:?} is not a number ({e})"))
}

fn raw_line(record: &csv::ByteRecord) -> String {
    record
        .iter()
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(",")
}

/// Reject NaN and infinities in the float columns, whatever the format.
fn finite_row(row: DatasetRow) -> std::result::Result<DatasetRow, String> {
    for (col, value) in [
        (COLUMNS[2], row.latitude),
        (COLUMNS[3], row.longitude),
        (COLUMNS[5], row.sea_level_mm),
    ] {
        if !value.is_finite() {
            return Err(format!("'{col}': {value} is not a finite number"));
        }
    }
    Ok(row)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct JsonRow {
    name: String,
    country: String,
    latitude: f64,
    longitude: f64,
    year: i32,
    sea_level_mm: f64,
}

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "name": "NEW_YORK", "country": "USA", "latitude": 40.7,
///     "longitude": -74.0, "year": 2020, "sea_level_mm": 100.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path, file: File) -> Result<StoreBuilder> {
    let invalid = |reason: String| SeaLevelError::InvalidSource {
        path: path.to_path_buf(),
        reason,
    };

    let root: JsonValue = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| invalid(format!("parsing JSON: {e}")))?;
    let records = root
        .as_array()
        .ok_or_else(|| invalid("expected a top-level JSON array".to_string()))?;

    let mut builder = StoreBuilder::new();

    for (row_index, rec) in records.iter().enumerate() {
        let row = JsonRow::deserialize(rec)
            .map_err(|e| e.to_string())
            .and_then(|row| {
                finite_row(DatasetRow {
                    name: row.name.trim().to_string(),
                    country: row.country.trim().to_string(),
                    latitude: row.latitude,
                    longitude: row.longitude,
                    year: row.year,
                    sea_level_mm: row.sea_level_mm,
                })
            })
            .map_err(|reason| SeaLevelError::malformed(row_index, rec.to_string(), reason))?;
        builder.insert(row);
    }

    Ok(builder)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the six dataset columns.
///
/// Strings may be Utf8 or LargeUtf8; numeric columns may be Float32,
/// Float64, Int32 or Int64. `year` must be an integer column.
fn load_parquet(path: &Path, file: File) -> Result<StoreBuilder> {
    let invalid = |reason: String| SeaLevelError::InvalidSource {
        path: path.to_path_buf(),
        reason,
    };

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| invalid(format!("reading parquet metadata: {e}")))?
        .build()
        .map_err(|e| invalid(format!("building parquet reader: {e}")))?;

    let mut builder = StoreBuilder::new();
    let mut row_index = 0;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| invalid(format!("reading parquet record batch: {e}")))?;
        let columns = locate_columns(&batch).map_err(invalid)?;

        for row in 0..batch.num_rows() {
            let parsed = parquet_row(&columns, row)
                .and_then(finite_row)
                .map_err(|reason| SeaLevelError::malformed(row_index, describe_row(&columns, row), reason))?;
            builder.insert(parsed);
            row_index += 1;
        }
    }

    Ok(builder)
}

// -- Parquet / Arrow helpers --

fn locate_columns(batch: &RecordBatch) -> std::result::Result<Vec<ArrayRef>, String> {
    COLUMNS
        .iter()
        .map(|name| {
            batch
                .column_by_name(name)
                .cloned()
                .ok_or_else(|| format!("Parquet file missing '{name}' column"))
        })
        .collect()
}

fn parquet_row(columns: &[ArrayRef], row: usize) -> std::result::Result<DatasetRow, String> {
    Ok(DatasetRow {
        name: text_at(&columns[0], row, COLUMNS[0])?.trim().to_string(),
        country: text_at(&columns[1], row, COLUMNS[1])?.trim().to_string(),
        latitude: number_at(&columns[2], row, COLUMNS[2])?,
        longitude: number_at(&columns[3], row, COLUMNS[3])?,
        year: year_at(&columns[4], row)?,
        sea_level_mm: number_at(&columns[5], row, COLUMNS[5])?,
    })
}

fn text_at(col: &ArrayRef, row: usize, name: &str) -> std::result::Result<String, String> {
    if col.is_null(row) {
        return Err(format!("null value in '{name}'"));
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => Err(format!("'{name}' is {other:?}, expected a string column")),
    }
}

fn number_at(col: &ArrayRef, row: usize, name: &str) -> std::result::Result<f64, String> {
    if col.is_null(row) {
        return Err(format!("null value in '{name}'"));
    }
    match col.data_type() {
        DataType::Float64 => Ok(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => Ok(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(row) as f64),
        other => Err(format!("'{name}' is {other:?}, expected a numeric column")),
    }
}

fn year_at(col: &ArrayRef, row: usize) -> std::result::Result<i32, String> {
    if col.is_null(row) {
        return Err("null value in 'year'".to_string());
    }
    match col.data_type() {
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => {
            let year = col.as_primitive::<Int64Type>().value(row);
            i32::try_from(year).map_err(|_| format!("'year': {year} out of range"))
        }
        other => Err(format!("'year' is {other:?}, expected an integer column")),
    }
}

fn describe_row(columns: &[ArrayRef], row: usize) -> String {
    columns
        .iter()
        .map(|col| array_value_to_string(col.as_ref(), row).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_skips_header_and_trims_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "sea.csv",
            "name,country,latitude,longitude,year,sea_level_mm\n\
             \x20NEW_YORK ,USA,40.7,-74.0,2020,100\n\
             NEW_YORK,USA,40.7,-74.0, 2030 ,120\n",
        );

        let store = load_file(&path).unwrap();
        assert_eq!(store.cities().collect::<Vec<_>>(), ["NEW_YORK"]);
        let city = store.get("NEW_YORK").unwrap();
        assert_eq!(city.years().collect::<Vec<_>>(), [2020, 2030]);
        assert!((city.value_at(2030).unwrap() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn malformed_row_reports_index_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "bad.csv",
            "name,country,latitude,longitude,year,sea_level_mm\n\
             MIAMI,USA,25.8,-80.2,2020,90\n\
             MIAMI,USA,north,-80.2,2030,110\n",
        );

        match load_file(&path) {
            Err(SeaLevelError::MalformedRow {
                row_index,
                raw_line,
                reason,
            }) => {
                assert_eq!(row_index, 1);
                assert_eq!(raw_line, "MIAMI,USA,north,-80.2,2030,110");
                assert!(reason.contains("latitude"), "{reason}");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_values_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "nan.csv",
            "name,country,latitude,longitude,year,sea_level_mm\n\
             A,X,0,0,2020,80\n\
             B,X,0,0,2020,NaN\n",
        );
        match load_file(&path) {
            Err(SeaLevelError::MalformedRow { row_index, reason, .. }) => {
                assert_eq!(row_index, 1);
                assert_eq!(reason, "'sea_level_mm': NaN is not a finite number");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }

        let path = write_temp(
            &dir,
            "inf.csv",
            "name,country,latitude,longitude,year,sea_level_mm\nA,X,inf,0,2020,80\n",
        );
        assert!(matches!(
            load_file(&path),
            Err(SeaLevelError::MalformedRow { row_index: 0, reason, .. }) if reason.contains("latitude")
        ));
    }

    #[test]
    fn invalid_utf8_row_keeps_raw_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.csv");
        let mut bytes = b"name,country,latitude,longitude,year,sea_level_mm\n".to_vec();
        bytes.extend_from_slice(b"MIAMI,USA,25.8,-80.2,2020,90\n");
        bytes.extend_from_slice(b"MI\xff\xfeAMI,USA,25.8,-80.2,2030,110\n");
        std::fs::write(&path, bytes).unwrap();

        match load_file(&path) {
            Err(SeaLevelError::MalformedRow {
                row_index,
                raw_line,
                reason,
            }) => {
                assert_eq!(row_index, 1);
                assert_eq!(raw_line, "MI\u{FFFD}\u{FFFD}AMI,USA,25.8,-80.2,2030,110");
                assert!(reason.contains("UTF-8"), "{reason}");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn short_row_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "short.csv",
            "name,country,latitude,longitude,year,sea_level_mm\nMIAMI,USA,25.8,-80.2,2020\n",
        );
        assert!(matches!(
            load_file(&path),
            Err(SeaLevelError::MalformedRow { row_index: 0, .. })
        ));
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            load_file(&path),
            Err(SeaLevelError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "sea.txt", "irrelevant");
        assert!(matches!(
            load_file(&path),
            Err(SeaLevelError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "sea.JSON",
            r#"[
                {"name": "LAGOS", "country": "NGA", "latitude": 6.5, "longitude": 3.4, "year": 2020, "sea_level_mm": 95.0},
                {"name": "LAGOS", "country": "NGA", "latitude": 6.5, "longitude": 3.4, "year": 2030, "sea_level_mm": 130.0}
            ]"#,
        );

        let store = load_file(&path).unwrap();
        let city = store.get("LAGOS").unwrap();
        assert_eq!(city.country(), "NGA");
        assert_eq!(city.years().count(), 2);
    }

    #[test]
    fn json_bad_record_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "sea.json",
            r#"[{"name": "LAGOS", "country": "NGA", "latitude": 6.5, "longitude": 3.4, "year": "soon", "sea_level_mm": 95.0}]"#,
        );
        assert!(matches!(
            load_file(&path),
            Err(SeaLevelError::MalformedRow { row_index: 0, .. })
        ));
    }

    #[test]
    fn json_object_root_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "sea.json", r#"{"name": "LAGOS"}"#);
        assert!(matches!(
            load_file(&path),
            Err(SeaLevelError::InvalidSource { .. })
        ));
    }
}
