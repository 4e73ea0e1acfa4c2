use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{TableView, DATE_COLUMN};

/// Write the rows of `view` as CSV: `Date` first, then the table's columns
/// in order. Dates are ISO `YYYY-MM-DD`, missing values are empty fields.
pub fn write_csv<W: Write>(view: &TableView<'_>, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![DATE_COLUMN.to_string()];
    header.extend(view.columns().iter().cloned());
    writer.write_record(&header).context("writing CSV header")?;

    for row in view.iter() {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.date.format("%Y-%m-%d").to_string());
        record.extend(row.values.iter().map(|v| v.to_string()));
        writer
            .write_record(&record)
            .with_context(|| format!("writing row dated {}", row.date))?;
    }

    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export `view` to a CSV file at `path`.
pub fn export_csv(view: &TableView<'_>, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_view, DateInterval};
    use crate::data::loader::{load_bytes, read_file};
    use crate::data::model::CellValue;
    use chrono::NaiveDate;

    const CSV: &str = "\
Date,Weight_kg,RENPHO_BodyFat_pct,PSA,Context
2024-11-03,81.9,,NaN,\"travel, late meal\"
2024-11-01,82.4,24.1,N/A,
2024-11-02,82.15,23.95,0.8,gym
";

    #[test]
    fn write_then_reload_yields_equal_table() {
        let table = load_bytes("in.csv", CSV.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_csv(&filter_view(&table, None), &mut buf).unwrap();
        let reloaded = load_bytes("out.csv", &buf).unwrap();
        assert_eq!(reloaded, table);
        assert_eq!(reloaded.rows[2].values[2], CellValue::Null);
        assert_eq!(reloaded.rows[0].values[2], CellValue::Null);
    }

    #[test]
    fn non_iso_dates_are_normalised_on_write() {
        let table = load_bytes("in.csv", b"Date,PSA\n11/05/2024,0.8\n").unwrap();
        let mut buf = Vec::new();
        write_csv(&filter_view(&table, None), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Date,PSA\n2024-11-05,0.8\n");
    }

    #[test]
    fn export_writes_only_filtered_rows() {
        let table = load_bytes("in.csv", CSV.as_bytes()).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
        let view = filter_view(&table, Some(DateInterval::new(day, day)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        export_csv(&view, &path).unwrap();

        let exported = load_bytes("export.csv", &read_file(&path).unwrap()).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported.rows[0].date, day);
        assert_eq!(exported.columns, table.columns);
    }
}
