use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Name of the only column every dataset must carry.
pub const DATE_COLUMN: &str = "Date";

// ---------------------------------------------------------------------------
// CellValue – a single cell in a measurement column
// ---------------------------------------------------------------------------

/// Field contents read as a missing value, besides the empty string.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A dynamically-typed cell. Numeric-looking text is stored as `Number`,
/// free text (e.g. the `Context` column) as `Text`, empty fields and
/// [`NA_MARKERS`] as `Null`. A `Number` is always finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Null,
}

impl CellValue {
    /// Classify a raw text field the way a CSV reader would.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || NA_MARKERS.contains(&s) {
            return CellValue::Null;
        }
        match s.parse::<f64>() {
            Ok(v) => CellValue::number(v),
            Err(_) => CellValue::Text(s.to_string()),
        }
    }

    /// `Number(v)` for finite `v`, `Null` otherwise.
    pub fn number(v: f64) -> Self {
        if v.is_finite() {
            CellValue::Number(v)
        } else {
            CellValue::Null
        }
    }

    /// The plottable value, if any. Text and non-finite numbers are not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Ordering used by the raw table view: nulls first, then numbers,
    /// then text.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &CellValue) -> u8 {
            match v {
                CellValue::Null => 0,
                CellValue::Number(_) => 1,
                CellValue::Text(_) => 2,
            }
        }
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// MeasurementRow – one dated observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub date: NaiveDate,
    /// Values aligned with [`MeasurementTable::columns`].
    pub values: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// MeasurementTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Row-oriented table of dated observations, sorted ascending by date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementTable {
    /// Header names in file order, excluding `Date`.
    pub columns: Vec<String>,
    pub rows: Vec<MeasurementRow>,
}

impl MeasurementTable {
    /// Build a table, stably sorting rows by date. Rows sharing a date keep
    /// their file order.
    pub fn new(columns: Vec<String>, mut rows: Vec<MeasurementRow>) -> Self {
        rows.sort_by_key(|r| r.date);
        MeasurementTable { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// `[min(Date), max(Date)]`, or `None` for an empty table.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.date;
        let last = self.rows.last()?.date;
        Some((first, last))
    }

    /// Value of `column` in row `row`; `Null` when the column is absent.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.values.get(column))
            .unwrap_or(&CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// TableView – borrowed subset of rows
// ---------------------------------------------------------------------------

/// A subset of a table's rows, in ascending date order. Never mutates the
/// underlying table.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub table: &'a MeasurementTable,
    pub rows: Vec<usize>,
}

impl<'a> TableView<'a> {
    pub fn new(table: &'a MeasurementTable, rows: Vec<usize>) -> Self {
        TableView { table, rows }
    }

    pub fn columns(&self) -> &'a [String] {
        &self.table.columns
    }

    /// Iterate the visible rows.
    pub fn iter(&self) -> impl Iterator<Item = &'a MeasurementRow> + '_ {
        self.rows.iter().filter_map(|&i| self.table.rows.get(i))
    }

    /// Copy the visible rows into a standalone table.
    #[cfg(test)]
    pub fn to_table(&self) -> MeasurementTable {
        MeasurementTable {
            columns: self.table.columns.clone(),
            rows: self.iter().cloned().collect(),
        }
    }
}
