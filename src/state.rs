use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::cache::{DataSource, DatasetCache};
use crate::dashboard::{Dashboard, Phase, Pipeline};
use crate::data::category::Category;
use crate::data::filter::DateSelection;
use crate::data::writer;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which page of the central panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Category(Category),
    Data,
}

impl Default for Tab {
    fn default() -> Self {
        Tab::Category(Category::WeightBodyComp)
    }
}

/// Sort order of the raw table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSort {
    /// `None` sorts by date, otherwise by value column index.
    pub column: Option<usize>,
    pub descending: bool,
}

/// The full UI state, independent of rendering.
///
/// Every handler that changes an input calls [`AppState::refresh`], which
/// re-runs the pipeline top to bottom. Nothing is recomputed between
/// interactions.
#[derive(Default)]
pub struct AppState {
    /// Current data source (None until a default path or upload is set).
    pub source: Option<DataSource>,

    pub cache: DatasetCache,
    pub pipeline: Pipeline,

    /// Date-range picker selection.
    pub selection: DateSelection,

    /// Output of the last successful run. Cleared when a run halts.
    pub dashboard: Option<Dashboard>,

    pub active_tab: Tab,
    pub table_sort: TableSort,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
    pub status_is_error: bool,
}

impl AppState {
    /// State for the given startup source and optional initial range.
    pub fn with_source(path: PathBuf, initial: Option<DateSelection>) -> Self {
        let mut state = AppState {
            source: Some(DataSource::File(path)),
            ..Default::default()
        };
        state.refresh();
        if let Some(sel) = initial {
            state.selection.start = sel.start.or(state.selection.start);
            state.selection.end = sel.end.or(state.selection.end);
            state.refresh();
        }
        state
    }

    pub fn is_halted(&self) -> bool {
        self.pipeline.phase() == Phase::Halted
    }

    /// Re-run Loading → Filtering → Rendering for the current inputs.
    pub fn refresh(&mut self) {
        let Some(source) = &self.source else {
            self.dashboard = None;
            return;
        };

        match self.pipeline.run(&mut self.cache, source, &mut self.selection) {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.status_message = None;
                self.status_is_error = false;
            }
            Err(e) => {
                if matches!(source, DataSource::File(_)) {
                    log::warn!(
                        "{} could not be loaded; waiting for an uploaded file",
                        source.display_name()
                    );
                }
                self.dashboard = None;
                self.status_message = Some(format!("Error loading data: {e}"));
                self.status_is_error = true;
            }
        }
    }

    /// Use an uploaded or dropped file as the data source.
    pub fn set_upload(&mut self, name: String, bytes: Arc<[u8]>) {
        self.cache.invalidate();
        self.source = Some(DataSource::Upload { name, bytes });
        self.refresh();
    }

    /// Open a file from disk as the data source.
    pub fn set_file(&mut self, path: PathBuf) {
        self.cache.invalidate();
        self.source = Some(DataSource::File(path));
        self.refresh();
    }

    /// Set one end of the date range, keeping it inside the data span.
    pub fn set_start(&mut self, date: Option<NaiveDate>) {
        self.selection.start = date;
        self.clamp_selection();
        self.refresh();
    }

    pub fn set_end(&mut self, date: Option<NaiveDate>) {
        self.selection.end = date;
        self.clamp_selection();
        self.refresh();
    }

    /// Reset the range to the full span of the loaded data.
    pub fn reset_range(&mut self) {
        if let Some(dash) = &self.dashboard {
            self.selection = DateSelection::full(dash.span);
        }
        self.refresh();
    }

    fn clamp_selection(&mut self) {
        if let Some(span) = self.dashboard.as_ref().and_then(|d| d.span) {
            self.selection.clamp_to(span);
        }
    }

    /// Click on a table header: sort by it, or flip direction if already.
    pub fn toggle_sort(&mut self, column: Option<usize>) {
        if self.table_sort.column == column {
            self.table_sort.descending = !self.table_sort.descending;
        } else {
            self.table_sort = TableSort {
                column,
                descending: false,
            };
        }
    }

    /// Visible row indices in the raw table's current sort order.
    pub fn sorted_rows(&self) -> Vec<usize> {
        let Some(dash) = &self.dashboard else {
            return Vec::new();
        };
        let table = &dash.table;
        let mut rows = dash.visible.clone();
        let sort = self.table_sort;
        rows.sort_by(|&a, &b| {
            let ord = match sort.column {
                None => table.rows[a].date.cmp(&table.rows[b].date),
                Some(c) => table.cell(a, c).sort_cmp(table.cell(b, c)),
            };
            if sort.descending {
                ord.reverse()
            } else {
                ord
            }
        });
        rows
    }

    /// Write the currently visible rows to `path`.
    pub fn export_visible(&mut self, path: &Path) {
        let Some(dash) = &self.dashboard else {
            return;
        };
        match writer::export_csv(&dash.view(), path) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", dash.visible.len(), path.display());
                self.status_message = Some(format!("Exported {} rows", dash.visible.len()));
                self.status_is_error = false;
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                self.status_message = Some(format!("Export failed: {e:#}"));
                self.status_is_error = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    const CSV: &str = "\
Date,Weight_kg,BP_Systolic
2024-11-01,82.4,128
2024-11-02,82.1,
2024-11-03,81.9,125
";

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_upload("health.csv".into(), Arc::from(CSV.as_bytes()));
        state
    }

    #[test]
    fn upload_loads_and_selects_full_range() {
        let state = loaded();
        assert!(!state.is_halted());
        assert!(state.status_message.is_none());
        assert_eq!(state.selection.start, Some(d("2024-11-01")));
        assert_eq!(state.dashboard.as_ref().unwrap().visible.len(), 3);
    }

    #[test]
    fn missing_default_file_halts_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_source(dir.path().join("absent.csv"), None);
        assert!(state.is_halted());
        assert!(state.dashboard.is_none());
        assert!(state.status_message.unwrap().contains("absent.csv"));
    }

    #[test]
    fn upload_recovers_from_halt() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::with_source(dir.path().join("absent.csv"), None);
        state.set_upload("health.csv".into(), Arc::from(CSV.as_bytes()));
        assert!(!state.is_halted());
        assert!(state.dashboard.is_some());
    }

    #[test]
    fn date_changes_refilter_and_clamp() {
        let mut state = loaded();
        state.set_start(Some(d("2024-11-02")));
        assert_eq!(state.dashboard.as_ref().unwrap().visible.len(), 2);

        state.set_end(Some(d("2025-01-01")));
        assert_eq!(state.selection.end, Some(d("2024-11-03")));

        state.set_end(None);
        assert_eq!(state.dashboard.as_ref().unwrap().visible.len(), 3);

        state.reset_range();
        assert_eq!(state.selection.end, Some(d("2024-11-03")));
    }

    #[test]
    fn initial_range_from_startup_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("health.csv");
        std::fs::write(&path, CSV).unwrap();
        let initial = DateSelection {
            start: Some(d("2024-11-03")),
            end: None,
        };
        let state = AppState::with_source(path, Some(initial));
        assert_eq!(state.selection.end, Some(d("2024-11-03")));
        assert_eq!(state.dashboard.as_ref().unwrap().visible.len(), 1);
    }

    #[test]
    fn table_sort_by_column_puts_nulls_first_and_flips() {
        let mut state = loaded();
        state.toggle_sort(Some(1));
        let rows = state.sorted_rows();
        let dash = state.dashboard.as_ref().unwrap();
        assert_eq!(dash.table.cell(rows[0], 1), &CellValue::Null);
        assert_eq!(dash.table.cell(rows[2], 1), &CellValue::Number(128.0));

        state.toggle_sort(Some(1));
        let rows = state.sorted_rows();
        let dash = state.dashboard.as_ref().unwrap();
        assert_eq!(dash.table.cell(rows[0], 1), &CellValue::Number(128.0));
    }

    #[test]
    fn export_writes_visible_rows() {
        let mut state = loaded();
        state.set_start(Some(d("2024-11-03")));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        state.export_visible(&path);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Date,Weight_kg,BP_Systolic\n2024-11-03,81.9,125\n");
    }
}
