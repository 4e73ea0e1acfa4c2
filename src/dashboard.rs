use std::sync::Arc;

use serde::Serialize;

use crate::cache::{DataSource, DatasetCache};
use crate::data::category::{select_columns, Category};
use crate::data::chart::{build_chart, ChartSpec};
use crate::data::filter::{filter_view, filtered_indices, DateInterval, DateSelection};
use crate::data::loader::DataLoadError;
use crate::data::model::{MeasurementTable, TableView};

// ---------------------------------------------------------------------------
// Render output
// ---------------------------------------------------------------------------

/// Charts produced for one category. `charts` may be empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub category: Category,
    pub label: &'static str,
    pub charts: Vec<ChartSpec>,
}

/// Build every section over an already-filtered view. Categories are
/// independent: an empty one never stops the others.
fn render_view(view: &TableView<'_>) -> Vec<Section> {
    Category::ALL
        .iter()
        .map(|&category| {
            let charts = category
                .charts()
                .iter()
                .filter_map(|rule| {
                    let columns = select_columns(view.columns(), &rule.rule);
                    build_chart(view, columns, rule)
                })
                .collect();
            Section {
                category,
                label: category.label(),
                charts,
            }
        })
        .collect()
}

/// Filter `table` to `interval` and build every section. Pure: the same
/// inputs always produce the same sections.
pub fn render(table: &MeasurementTable, interval: Option<DateInterval>) -> Vec<Section> {
    render_view(&filter_view(table, interval))
}

// ---------------------------------------------------------------------------
// Pipeline state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Filtering,
    Rendering,
    /// Terminal for this run: the dataset failed to load.
    Halted,
}

/// Result of one successful pipeline run.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub table: Arc<MeasurementTable>,
    /// Full date span of the loaded table.
    pub span: Option<DateInterval>,
    /// Interval actually applied, `None` when the selection was partial.
    pub interval: Option<DateInterval>,
    /// Rows that passed the date filter.
    pub visible: Vec<usize>,
    pub sections: Vec<Section>,
}

impl Dashboard {
    pub fn view(&self) -> TableView<'_> {
        TableView::new(&self.table, self.visible.clone())
    }

    pub fn section(&self, category: Category) -> Option<&Section> {
        self.sections.iter().find(|s| s.category == category)
    }

    pub fn chart_count(&self) -> usize {
        self.sections.iter().map(|s| s.charts.len()).sum()
    }

    pub fn report(&self, source: &DataSource) -> SpecReport<'_> {
        SpecReport {
            source: source.display_name(),
            span: self.span,
            interval: self.interval,
            total_rows: self.table.len(),
            visible_rows: self.visible.len(),
            sections: &self.sections,
        }
    }
}

/// Serialisable summary of a run, printed by `--dump-specs`.
#[derive(Debug, Serialize)]
pub struct SpecReport<'a> {
    pub source: String,
    pub span: Option<DateInterval>,
    pub interval: Option<DateInterval>,
    pub total_rows: usize,
    pub visible_rows: usize,
    pub sections: &'a [Section],
}

/// Runs Loading → Filtering → Rendering, or stops in `Halted`.
#[derive(Debug)]
pub struct Pipeline {
    phase: Phase,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
        }
    }
}

impl Pipeline {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        log::debug!("pipeline: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Recompute the whole dashboard from scratch. A freshly parsed table
    /// resets `selection` to its full date span.
    pub fn run(
        &mut self,
        cache: &mut DatasetCache,
        source: &DataSource,
        selection: &mut DateSelection,
    ) -> Result<Dashboard, DataLoadError> {
        self.enter(Phase::Loading);
        let loaded = match cache.load(source) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!("Failed to load {}: {e}", source.display_name());
                self.enter(Phase::Halted);
                return Err(e);
            }
        };
        let table = loaded.table;
        let span = DateInterval::spanning(&table);
        if loaded.fresh {
            *selection = DateSelection::full(span);
        }

        self.enter(Phase::Filtering);
        let interval = selection.interval();
        let visible = filtered_indices(&table, interval);

        self.enter(Phase::Rendering);
        let sections = render(&table, interval);

        Ok(Dashboard {
            table,
            span,
            interval,
            visible,
            sections,
        })
    }
}
