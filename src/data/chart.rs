use chrono::NaiveDate;
use serde::Serialize;

use super::category::ChartRule;
use super::model::{TableView, DATE_COLUMN};

// ---------------------------------------------------------------------------
// Chart specification
// ---------------------------------------------------------------------------

/// One observation on a line. `value: None` is a missing reading and is
/// drawn as a gap, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub column: String,
    pub points: Vec<SeriesPoint>,
}

/// Everything the rendering surface needs to draw one line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_column: String,
    pub y_columns: Vec<String>,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
}

/// Build a line chart over `view` for `y_columns`. Returns `None` when no
/// columns were selected. Values are passed through untouched.
pub fn build_chart(view: &TableView<'_>, y_columns: Vec<String>, rule: &ChartRule) -> Option<ChartSpec> {
    if y_columns.is_empty() {
        return None;
    }

    let series = y_columns
        .iter()
        .map(|col| ChartSeries {
            column: col.clone(),
            points: extract_points(view, col),
        })
        .collect();

    Some(ChartSpec {
        title: rule.title.to_string(),
        x_column: DATE_COLUMN.to_string(),
        y_columns,
        y_label: rule.y_label.to_string(),
        series,
    })
}

fn extract_points(view: &TableView<'_>, column: &str) -> Vec<SeriesPoint> {
    let idx = view.table.column_index(column);
    view.iter()
        .map(|row| SeriesPoint {
            date: row.date,
            value: idx.and_then(|i| row.values.get(i)).and_then(|v| v.as_f64()),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Plot geometry
// ---------------------------------------------------------------------------

/// X coordinate for a date: whole days since the Unix epoch.
pub fn date_to_x(date: NaiveDate) -> f64 {
    (date - NaiveDate::default()).num_days() as f64
}

/// Inverse of [`date_to_x`], rounding to the nearest day.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    chrono::TimeDelta::try_days(x.round() as i64)
        .and_then(|days| NaiveDate::default().checked_add_signed(days))
}

impl ChartSeries {
    /// Split the series into runs of consecutive present values, so each
    /// run can be drawn as its own line and missing readings show as gaps.
    pub fn segments(&self) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();

        for point in &self.points {
            match point.value {
                Some(v) => current.push([date_to_x(point.date), v]),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    pub fn present_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::category::ColumnRule;
    use crate::data::filter::filter_view;
    use crate::data::model::{CellValue, MeasurementRow, MeasurementTable};

    const RULE: ChartRule = ChartRule {
        title: "Blood Pressure (Sys/Dia)",
        y_label: "mmHg",
        rule: ColumnRule::Exact(&["BP_Systolic", "BP_Diastolic"]),
    };

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn table() -> MeasurementTable {
        let row = |date: &str, sys: CellValue, dia: CellValue| MeasurementRow {
            date: d(date),
            values: vec![sys, dia],
        };
        MeasurementTable::new(
            vec!["BP_Systolic".into(), "BP_Diastolic".into()],
            vec![
                row("2024-11-01", CellValue::Number(128.0), CellValue::Number(82.0)),
                row("2024-11-02", CellValue::Null, CellValue::Number(80.0)),
                row("2024-11-03", CellValue::Number(125.0), CellValue::Text("n/a".into())),
                row("2024-11-04", CellValue::Number(122.0), CellValue::Number(78.0)),
            ],
        )
    }

    #[test]
    fn no_columns_means_no_chart() {
        let t = table();
        assert!(build_chart(&filter_view(&t, None), Vec::new(), &RULE).is_none());
    }

    #[test]
    fn spec_carries_axes_title_and_raw_values() {
        let t = table();
        let cols = vec!["BP_Systolic".to_string(), "BP_Diastolic".to_string()];
        let spec = build_chart(&filter_view(&t, None), cols.clone(), &RULE).unwrap();

        assert_eq!(spec.title, "Blood Pressure (Sys/Dia)");
        assert_eq!(spec.x_column, "Date");
        assert_eq!(spec.y_columns, cols);
        assert_eq!(spec.y_label, "mmHg");

        let sys: Vec<_> = spec.series[0].points.iter().map(|p| p.value).collect();
        assert_eq!(sys, vec![Some(128.0), None, Some(125.0), Some(122.0)]);
        let dia: Vec<_> = spec.series[1].points.iter().map(|p| p.value).collect();
        assert_eq!(dia, vec![Some(82.0), Some(80.0), None, Some(78.0)]);
    }

    #[test]
    fn missing_values_split_the_line() {
        let t = table();
        let spec = build_chart(&filter_view(&t, None), vec!["BP_Systolic".into()], &RULE).unwrap();
        let segments = spec.series[0].segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 1);
        assert_eq!(segments[1].len(), 2);
        assert_eq!(segments[1][0][1], 125.0);
        assert_eq!(spec.series[0].present_count(), 3);
    }

    #[test]
    fn all_missing_series_has_no_segments() {
        let series = ChartSeries {
            column: "PSA".into(),
            points: vec![SeriesPoint { date: d("2024-11-01"), value: None }],
        };
        assert!(series.segments().is_empty());
    }

    #[test]
    fn date_axis_round_trips() {
        let date = d("2024-11-02");
        assert_eq!(x_to_date(date_to_x(date)), Some(date));
        assert_eq!(date_to_x(d("1970-01-02")), 1.0);
        assert_eq!(x_to_date(f64::NAN), None);
    }
}
