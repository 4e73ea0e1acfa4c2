use std::sync::Arc;

use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::DATE_COLUMN;
use crate::state::{AppState, TableSort};

// ---------------------------------------------------------------------------
// Raw data tab – sortable grid of the filtered rows
// ---------------------------------------------------------------------------

fn header_text(name: &str, sort: TableSort, column: Option<usize>) -> String {
    if sort.column != column {
        return name.to_string();
    }
    let arrow = if sort.descending { "⏷" } else { "⏶" };
    format!("{name} {arrow}")
}

/// Render the filtered rows as a grid. Clicking a header sorts by that
/// column; clicking it again flips the direction.
pub fn raw_table(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = state.dashboard.as_ref().map(|d| Arc::clone(&d.table)) else {
        return;
    };
    let rows = state.sorted_rows();
    let sort = state.table_sort;
    let mut clicked: Option<Option<usize>> = None;

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(90.0))
            .columns(Column::auto().at_least(60.0), table.columns.len())
            .header(22.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    if ui.button(header_text(DATE_COLUMN, sort, None)).clicked() {
                        clicked = Some(None);
                    }
                });
                for (i, name) in table.columns.iter().enumerate() {
                    header.col(|ui: &mut Ui| {
                        if ui.button(header_text(name, sort, Some(i))).clicked() {
                            clicked = Some(Some(i));
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let Some(record) = rows.get(row.index()).and_then(|&r| table.rows.get(r))
                    else {
                        return;
                    };
                    row.col(|ui: &mut Ui| {
                        ui.label(record.date.format("%Y-%m-%d").to_string());
                    });
                    for value in &record.values {
                        row.col(|ui: &mut Ui| {
                            ui.label(value.to_string());
                        });
                    }
                });
            });
    });

    if let Some(column) = clicked {
        state.toggle_sort(column);
    }
}
