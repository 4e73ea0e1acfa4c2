use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, MeasurementRow, MeasurementTable, DATE_COLUMN};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything that stops a dataset from loading. The dashboard halts on all
/// of these rather than render a partial table.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet read error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow conversion error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("dataset has no 'Date' column")]
    MissingDateColumn,

    #[error("row {row}: '{value}' is not a recognised date")]
    InvalidDate { row: usize, value: String },

    #[error("malformed dataset: {0}")]
    Malformed(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, DataLoadError>;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// On-disk layouts the loader understands, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    Json,
    Parquet,
}

impl FileFormat {
    /// Detect the format from a file name. No extension means CSV.
    pub fn from_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "" | "csv" | "txt" => Ok(FileFormat::Csv),
            "tsv" | "tab" => Ok(FileFormat::Tsv),
            "json" => Ok(FileFormat::Json),
            "parquet" | "pq" => Ok(FileFormat::Parquet),
            other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Read a dataset file from disk. Parsing is left to [`load_bytes`] so the
/// caller can hash the raw bytes first.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a measurement table from an in-memory buffer (an uploaded or
/// dropped file). `name` is only used to pick the format.
pub fn load_bytes(name: &str, bytes: &[u8]) -> Result<MeasurementTable> {
    match FileFormat::from_name(name)? {
        FileFormat::Csv => load_delimited(bytes, b','),
        FileFormat::Tsv => load_delimited(bytes, b'\t'),
        FileFormat::Json => load_json(bytes),
        FileFormat::Parquet => load_parquet(bytes),
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Date-only layouts, tried in order. Month-first precedes day-first for
/// slash dates.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a calendar date, truncating any time-of-day component.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

fn require_date(value: &str, row: usize) -> Result<NaiveDate> {
    parse_date(value).ok_or_else(|| DataLoadError::InvalidDate {
        row,
        value: value.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Rename repeated header names to `name.1`, `name.2`, ... so no column
/// shadows another. Only later occurrences are renamed.
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut n = 0;
        while out.contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        out.push(candidate);
    }
    out
}

/// Header row with column names, one of which is `Date`. Every other
/// column becomes a value column; empty fields are missing values. Short
/// rows are padded with missing values, rows with extra fields are
/// rejected.
fn load_delimited(bytes: &[u8], delimiter: u8) -> Result<MeasurementTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = dedupe_names(
        reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect(),
    );

    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .ok_or(DataLoadError::MissingDateColumn)?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(DataLoadError::Malformed(format!(
                "row {row_no} has {} fields but the header has {}",
                record.len(),
                headers.len()
            )));
        }
        let date = require_date(record.get(date_idx).unwrap_or(""), row_no)?;

        let values = (0..headers.len())
            .filter(|&i| i != date_idx)
            .map(|i| CellValue::parse(record.get(i).unwrap_or("")))
            .collect();

        rows.push(MeasurementRow { date, values });
    }

    Ok(MeasurementTable::new(columns, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Date": 1730419200000, "Weight_kg": 82.4, "Context": "travel" },
///   { "Date": "2024-11-02", "Weight_kg": null }
/// ]
/// ```
///
/// `Date` is either epoch milliseconds (the default `date_format='epoch'`)
/// or a date string (`date_format='iso'` or hand-written files).
///
/// Columns are ordered by the first record in which each key appears.
fn load_json(bytes: &[u8]) -> Result<MeasurementTable> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected a top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::Malformed(format!("record {i} is not an object")))?;
        for key in obj.keys() {
            if key != DATE_COLUMN && !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    if !records.is_empty() && records.iter().all(|r| r.get(DATE_COLUMN).is_none()) {
        return Err(DataLoadError::MissingDateColumn);
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        // Shape was checked in the first pass.
        let Some(obj) = rec.as_object() else { continue };
        let date = match obj.get(DATE_COLUMN) {
            Some(JsonValue::String(s)) => require_date(s, i)?,
            Some(JsonValue::Number(n)) => epoch_millis_date(n, i)?,
            Some(other) => {
                return Err(DataLoadError::InvalidDate {
                    row: i,
                    value: other.to_string(),
                })
            }
            None => {
                return Err(DataLoadError::InvalidDate {
                    row: i,
                    value: String::new(),
                })
            }
        };
        let values = columns
            .iter()
            .map(|c| obj.get(c).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        rows.push(MeasurementRow { date, values });
    }

    Ok(MeasurementTable::new(columns, rows))
}

fn epoch_millis_date(n: &serde_json::Number, row: usize) -> Result<NaiveDate> {
    n.as_i64()
        .or_else(|| n.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| DataLoadError::InvalidDate {
            row,
            value: n.to_string(),
        })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Null => CellValue::Null,
        JsonValue::Number(n) => n.as_f64().map(CellValue::number).unwrap_or(CellValue::Null),
        JsonValue::String(s) => CellValue::parse(s),
        JsonValue::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected schema:
/// - `Date`: Date32, Date64, Timestamp or a string column
/// - any numeric column is read as Float64
/// - anything else is read as text
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(bytes: &[u8]) -> Result<MeasurementTable> {
    let data = bytes::Bytes::copy_from_slice(bytes);
    let builder = ParquetRecordBatchReaderBuilder::try_new(data)?;

    let schema = builder.schema().clone();
    let date_idx = schema
        .index_of(DATE_COLUMN)
        .map_err(|_| DataLoadError::MissingDateColumn)?;
    let columns: Vec<(usize, String)> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(i, f)| (i, f.name().clone()))
        .collect();

    let reader = builder.build()?;
    let mut rows = Vec::new();

    for batch in reader {
        let batch = batch?;
        let dates = date_column(batch.column(date_idx), rows.len())?;

        let value_cols = columns
            .iter()
            .map(|(i, _)| value_column(batch.column(*i)))
            .collect::<Result<Vec<_>>>()?;

        for (row, date) in dates.into_iter().enumerate() {
            let values = value_cols.iter().map(|col| col[row].clone()).collect();
            rows.push(MeasurementRow { date, values });
        }
    }

    let names = dedupe_names(columns.into_iter().map(|(_, n)| n).collect());
    Ok(MeasurementTable::new(names, rows))
}

// -- Parquet / Arrow helpers --

/// Decode the date column of one batch. `offset` is the number of rows in
/// earlier batches, used for error messages.
fn date_column(col: &Arc<dyn Array>, offset: usize) -> Result<Vec<NaiveDate>> {
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let text = cast(col, &DataType::Utf8)?;
            let text = text.as_string::<i32>();
            (0..text.len())
                .map(|i| {
                    let raw = if text.is_null(i) { "" } else { text.value(i) };
                    require_date(raw, offset + i)
                })
                .collect()
        }
        _ => {
            let days = cast(col, &DataType::Date32)?;
            let days = days.as_primitive::<Date32Type>();
            (0..days.len())
                .map(|i| {
                    if days.is_null(i) {
                        return Err(DataLoadError::InvalidDate {
                            row: offset + i,
                            value: "null".into(),
                        });
                    }
                    days.value_as_date(i).ok_or_else(|| DataLoadError::InvalidDate {
                        row: offset + i,
                        value: days.value(i).to_string(),
                    })
                })
                .collect()
        }
    }
}

/// Decode a value column of one batch into cells.
fn value_column(col: &Arc<dyn Array>) -> Result<Vec<CellValue>> {
    if col.data_type().is_numeric() {
        let floats = cast(col, &DataType::Float64)?;
        let floats = floats.as_primitive::<Float64Type>();
        return Ok((0..floats.len())
            .map(|i| {
                if floats.is_null(i) {
                    CellValue::Null
                } else {
                    CellValue::number(floats.value(i))
                }
            })
            .collect());
    }

    let text = cast(col, &DataType::Utf8)?;
    let text = text.as_string::<i32>();
    Ok((0..text.len())
        .map(|i| {
            if text.is_null(i) {
                CellValue::Null
            } else {
                CellValue::parse(text.value(i))
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const SCENARIO_CSV: &str = "\
Date,Weight_kg,BP_Systolic,BP_Diastolic,Hormone_TSH
2024-11-01,82.4,128,82,2.1
2024-11-02,82.1,,80,
2024-11-03,81.9,125,79,2.3
";

    #[test]
    fn loads_csv_with_dates_and_gaps() {
        let table = load_bytes("MegaDataset.csv", SCENARIO_CSV.as_bytes()).unwrap();
        assert_eq!(
            table.columns,
            vec!["Weight_kg", "BP_Systolic", "BP_Diastolic", "Hormone_TSH"]
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].date, d("2024-11-01"));
        assert_eq!(table.rows[1].values[1], CellValue::Null);
        assert_eq!(table.rows[1].values[3], CellValue::Null);
        assert_eq!(table.rows[2].values[0], CellValue::Number(81.9));
    }

    #[test]
    fn missing_date_column_is_a_load_error() {
        let err = load_bytes("x.csv", b"Day,Weight_kg\n2024-11-01,80\n").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingDateColumn));
        assert!(err.to_string().contains("Date"));
    }

    #[test]
    fn unparsable_date_reports_row_and_value() {
        let err = load_bytes("x.csv", b"Date,Weight_kg\n2024-11-01,80\nsoon,81\n").unwrap_err();
        match err {
            DataLoadError::InvalidDate { row, value } => {
                assert_eq!(row, 1);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_date_is_rejected() {
        let err = load_bytes("x.csv", b"Date,Weight_kg\n,80\n").unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidDate { row: 0, .. }));
    }

    #[test]
    fn text_columns_survive_as_text() {
        let table = load_bytes(
            "x.csv",
            b"Date,Weight_kg,Context\n2024-11-01,80,\"travel, jetlag\"\n",
        )
        .unwrap();
        assert_eq!(table.rows[0].values[1], CellValue::Text("travel, jetlag".into()));
    }

    #[test]
    fn byte_order_mark_on_header_is_ignored() {
        let table = load_bytes("x.csv", "\u{feff}Date,PSA\n2024-11-01,0.8\n".as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["PSA"]);
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let table = load_bytes("x.tsv", b"Date\tBP_Pulse\n2024-11-01\t61\n").unwrap();
        assert_eq!(table.rows[0].values[0], CellValue::Number(61.0));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = load_bytes("scan.xlsx", b"").unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn read_file_then_load_bytes_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SCENARIO_CSV.as_bytes()).unwrap();
        let bytes = read_file(file.path()).unwrap();
        let table = load_bytes(&file.path().to_string_lossy(), &bytes).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn row_with_extra_fields_is_malformed() {
        let err = load_bytes("x.csv", b"Date,Weight_kg\n2024-11-01,82.4,999,junk\n").unwrap_err();
        match err {
            DataLoadError::Malformed(msg) => {
                assert!(msg.contains("row 0"), "{msg}");
                assert!(msg.contains("4 fields"), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_rows_are_padded_with_missing_values() {
        let table = load_bytes("x.csv", b"Date,Weight_kg,BP_Pulse\n2024-11-01,82.4\n").unwrap();
        assert_eq!(table.rows[0].values, vec![CellValue::Number(82.4), CellValue::Null]);
    }

    #[test]
    fn duplicate_headers_are_numbered() {
        let table = load_bytes(
            "x.csv",
            b"Date,PSA,PSA,TSH,PSA\n2024-11-01,0.8,0.9,1.9,1.0\n",
        )
        .unwrap();
        assert_eq!(table.columns, vec!["PSA", "PSA.1", "TSH", "PSA.2"]);
        assert_eq!(table.rows[0].values[1], CellValue::Number(0.9));
        assert_eq!(table.rows[0].values[3], CellValue::Number(1.0));
    }

    #[test]
    fn na_markers_load_as_missing() {
        let table = load_bytes("x.csv", b"Date,PSA,Context\n2024-11-01,NaN,N/A\n").unwrap();
        assert_eq!(table.rows[0].values, vec![CellValue::Null, CellValue::Null]);
    }

    #[test]
    fn parse_date_accepts_common_layouts() {
        assert_eq!(parse_date("2024-11-05"), Some(d("2024-11-05")));
        assert_eq!(parse_date("2024/11/05"), Some(d("2024-11-05")));
        assert_eq!(parse_date("11/05/2024"), Some(d("2024-11-05")));
        // Day-first only when month-first is impossible.
        assert_eq!(parse_date("25/11/2024"), Some(d("2024-11-25")));
        assert_eq!(parse_date("25.11.2024"), Some(d("2024-11-25")));
        assert_eq!(parse_date("2024-11-05 07:30:00"), Some(d("2024-11-05")));
        assert_eq!(parse_date("2024-11-05T07:30"), Some(d("2024-11-05")));
        assert_eq!(parse_date("2024-11-05T07:30:00+01:00"), Some(d("2024-11-05")));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn loads_json_records() {
        let json = br#"[
            {"Date": "2024-11-02", "Weight_kg": 82.0, "Context": "gym"},
            {"Date": "2024-11-01", "Weight_kg": null, "PSA": 0.7}
        ]"#;
        let table = load_bytes("data.json", json).unwrap();
        assert_eq!(table.columns, vec!["Context", "Weight_kg", "PSA"]);
        assert_eq!(table.rows[0].date, d("2024-11-01"));
        assert_eq!(table.rows[0].values[1], CellValue::Null);
        assert_eq!(table.rows[0].values[2], CellValue::Number(0.7));
        assert_eq!(table.rows[1].values[0], CellValue::Text("gym".into()));
    }

    #[test]
    fn json_epoch_millisecond_dates_are_accepted() {
        let json = br#"[
            {"Date": 1730419200000, "Weight_kg": 82.4},
            {"Date": 1730505600000.0, "Weight_kg": 82.1}
        ]"#;
        let table = load_bytes("data.json", json).unwrap();
        assert_eq!(table.rows[0].date, d("2024-11-01"));
        assert_eq!(table.rows[1].date, d("2024-11-02"));
        assert_eq!(table.rows[0].values[0], CellValue::Number(82.4));
    }

    #[test]
    fn json_non_date_values_are_rejected() {
        let err = load_bytes("data.json", br#"[{"Date": 1.5}]"#).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidDate { row: 0, .. }));
        let err = load_bytes("data.json", br#"[{"Date": true}]"#).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidDate { row: 0, .. }));
    }

    #[test]
    fn json_without_dates_is_rejected() {
        let err = load_bytes("data.json", br#"[{"Weight_kg": 80}]"#).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingDateColumn));
        let err = load_bytes("data.json", br#"{"Date": "2024-11-01"}"#).unwrap_err();
        assert!(matches!(err, DataLoadError::Malformed(_)));
    }

    fn parquet_bytes(batch: &RecordBatch) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        buf
    }

    #[test]
    fn loads_parquet_with_date32_column() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let day = |s: &str| (d(s) - epoch).num_days() as i32;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Date32, false),
            Field::new("Weight_kg", DataType::Float64, true),
            Field::new("BP_Pulse", DataType::Int64, true),
            Field::new("Context", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Date32Array::from(vec![day("2024-11-02"), day("2024-11-01")])),
                Arc::new(Float64Array::from(vec![Some(82.0), None])),
                Arc::new(Int64Array::from(vec![Some(61), Some(64)])),
                Arc::new(StringArray::from(vec![None, Some("travel")])),
            ],
        )
        .unwrap();

        let table = load_bytes("health.parquet", &parquet_bytes(&batch)).unwrap();
        assert_eq!(table.columns, vec!["Weight_kg", "BP_Pulse", "Context"]);
        assert_eq!(table.rows[0].date, d("2024-11-01"));
        assert_eq!(table.rows[0].values[0], CellValue::Null);
        assert_eq!(table.rows[0].values[1], CellValue::Number(64.0));
        assert_eq!(table.rows[0].values[2], CellValue::Text("travel".into()));
        assert_eq!(table.rows[1].values[0], CellValue::Number(82.0));
    }

    #[test]
    fn loads_parquet_with_string_dates() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Utf8, false),
            Field::new("TSH", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["2024-11-01"])),
                Arc::new(Float64Array::from(vec![Some(1.9)])),
            ],
        )
        .unwrap();

        let table = load_bytes("health.pq", &parquet_bytes(&batch)).unwrap();
        assert_eq!(table.rows[0].date, d("2024-11-01"));
        assert_eq!(table.rows[0].values[0], CellValue::Number(1.9));
    }

    #[test]
    fn parquet_without_date_column_is_rejected() {
        let schema = Arc::new(Schema::new(vec![Field::new("TSH", DataType::Float64, true)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Float64Array::from(vec![Some(1.9)]))])
                .unwrap();
        let err = load_bytes("health.parquet", &parquet_bytes(&batch)).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingDateColumn));
    }
}
