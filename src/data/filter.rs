use chrono::NaiveDate;
use serde::Serialize;

use super::model::{MeasurementTable, TableView};

// ---------------------------------------------------------------------------
// Date interval and the user's (possibly partial) selection
// ---------------------------------------------------------------------------

/// Inclusive calendar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    /// Endpoints are ordered, so a reversed pick names the same interval.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            DateInterval { start: a, end: b }
        } else {
            DateInterval { start: b, end: a }
        }
    }

    /// The full span of a table, or `None` when it has no rows.
    pub fn spanning(table: &MeasurementTable) -> Option<Self> {
        table.date_span().map(|(a, b)| DateInterval::new(a, b))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Date-range picker state. Either endpoint may be unset while the user is
/// still choosing; only a complete pair narrows the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateSelection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateSelection {
    /// Both endpoints set to the interval, or nothing for an empty table.
    pub fn full(span: Option<DateInterval>) -> Self {
        match span {
            Some(iv) => DateSelection {
                start: Some(iv.start),
                end: Some(iv.end),
            },
            None => DateSelection::default(),
        }
    }

    /// The interval to filter by, present only when both endpoints are set.
    pub fn interval(&self) -> Option<DateInterval> {
        Some(DateInterval::new(self.start?, self.end?))
    }

    /// Pull any set endpoint inside `span`, like a picker bounded by the
    /// data's min and max dates.
    pub fn clamp_to(&mut self, span: DateInterval) {
        let clamp = |d: NaiveDate| d.clamp(span.start, span.end);
        self.start = self.start.map(clamp);
        self.end = self.end.map(clamp);
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of rows whose date falls inside `interval`.
///
/// `None` stands for a partial or missing selection and keeps every row.
pub fn filtered_indices(table: &MeasurementTable, interval: Option<DateInterval>) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| interval.map_or(true, |iv| iv.contains(row.date)))
        .map(|(i, _)| i)
        .collect()
}

/// Borrowed view over the rows [`filtered_indices`] keeps.
pub fn filter_view(table: &MeasurementTable, interval: Option<DateInterval>) -> TableView<'_> {
    TableView::new(table, filtered_indices(table, interval))
}
