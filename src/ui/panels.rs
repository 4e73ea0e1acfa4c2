use std::sync::Arc;

use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::category::Category;
use crate::state::{AppState, Tab};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – date range
// ---------------------------------------------------------------------------

/// A checkbox plus date picker for one end of the range. Returns the new
/// endpoint when the user changed it; an unchecked box is an unset end.
fn endpoint_picker(
    ui: &mut Ui,
    label: &str,
    id: &str,
    current: Option<NaiveDate>,
    fallback: NaiveDate,
) -> Option<Option<NaiveDate>> {
    let mut enabled = current.is_some();
    let mut date = current.unwrap_or(fallback);
    let mut changed = None;

    ui.horizontal(|ui: &mut Ui| {
        if ui.checkbox(&mut enabled, label).changed() {
            changed = Some(enabled.then_some(date));
        }
        ui.add_enabled_ui(enabled, |ui: &mut Ui| {
            if ui.add(DatePickerButton::new(&mut date).id_salt(id)).changed() {
                changed = Some(Some(date));
            }
        });
    });
    changed
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dash) = &state.dashboard else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some(span) = dash.span else {
        ui.label("The dataset has no rows.");
        return;
    };
    let table = Arc::clone(&dash.table);
    let visible = dash.visible.len();

    ui.strong("Select Date Range");
    let start = endpoint_picker(ui, "From", "range_start", state.selection.start, span.start);
    let end = endpoint_picker(ui, "To", "range_end", state.selection.end, span.end);
    if ui.small_button("Full range").clicked() {
        state.reset_range();
    } else if let Some(start) = start {
        state.set_start(start);
    } else if let Some(end) = end {
        state.set_end(end);
    }

    if state.selection.interval().is_none() {
        ui.label(RichText::new("Pick both ends to filter.").weak());
    }

    ui.separator();
    ui.label(format!("Data: {} → {}", span.start, span.end));
    ui.label(format!("{visible} of {} rows shown", table.len()));

    // Columns no category picks up are still listed in the Data tab.
    let unclaimed: Vec<&String> = table
        .columns
        .iter()
        .filter(|c| c.as_str() != "Context")
        .filter(|c| !Category::ALL.iter().any(|cat| cat.claims(c)))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if !unclaimed.is_empty() {
                egui::CollapsingHeader::new(format!("Other columns ({})", unclaimed.len()))
                    .id_salt("other_columns")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for col in &unclaimed {
                            ui.label(col.as_str());
                        }
                    });
            }

            if table.has_column("Context") {
                ui.separator();
                ui.label("Context flags are included in the dataset (see 'Context' column).");
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.add_enabled(state.source.is_some(), egui::Button::new("Reload")).clicked() {
                state.refresh();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dashboard.is_some(), egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(source) = &state.source {
            ui.label(source.display_name());
        }
        if let Some(dash) = &state.dashboard {
            ui.label(format!(
                "{} rows loaded, {} visible, {} charts",
                dash.table.len(),
                dash.visible.len(),
                dash.chart_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if state.status_is_error {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – category tabs
// ---------------------------------------------------------------------------

/// Render the tab strip and the active tab's contents.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Health Dashboard");
    ui.label("Integrated RENPHO, Blood Pressure, and Bloods");
    ui.add_space(4.0);

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for category in Category::ALL {
            ui.selectable_value(&mut state.active_tab, Tab::Category(category), category.label());
        }
        ui.selectable_value(&mut state.active_tab, Tab::Data, "Data");
    });
    ui.separator();

    if state.dashboard.is_none() {
        halted_notice(ui, state);
        return;
    }

    match state.active_tab {
        Tab::Category(category) => category_section(ui, state, category),
        Tab::Data => table::raw_table(ui, state),
    }
}

fn category_section(ui: &mut Ui, state: &AppState, category: Category) {
    ui.heading(category.heading());

    let Some(section) = state.dashboard.as_ref().and_then(|d| d.section(category)) else {
        return;
    };
    if section.charts.is_empty() {
        ui.label(RichText::new("No data for this category.").weak());
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, chart) in section.charts.iter().enumerate() {
                plot::line_chart(ui, chart, category as usize * 16 + i);
            }
        });
}

/// Shown instead of the charts when the last run halted at loading.
fn halted_notice(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        if state.is_halted() {
            if let Some(msg) = &state.status_message {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
        } else {
            ui.label("No dataset loaded.");
        }
        ui.add_space(8.0);
        ui.label("Drop a CSV, TSV, JSON or Parquet file onto this window, or");
        if ui.button("Open a file…").clicked() {
            open_file_dialog(state);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open health data")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.set_file(path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .set_file_name("health_filtered.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_visible(&path);
    }
}
