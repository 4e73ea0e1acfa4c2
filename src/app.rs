use std::sync::Arc;

use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HealthDashApp {
    pub state: AppState,
}

impl HealthDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Files dropped onto the window replace the current source.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        if let Some(bytes) = file.bytes {
            self.state.set_upload(file.name, bytes);
        } else if let Some(path) = file.path {
            match std::fs::read(&path) {
                Ok(bytes) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or(file.name);
                    self.state.set_upload(name, Arc::from(bytes));
                }
                Err(e) => {
                    log::error!("Failed to read dropped file {}: {e}", path.display());
                    self.state.status_message = Some(format!("Error: {e}"));
                    self.state.status_is_error = true;
                }
            }
        }
    }
}

impl eframe::App for HealthDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: date range ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: category tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &mut self.state);
        });
    }
}
