mod app;
mod cache;
mod cli;
mod color;
mod dashboard;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::HealthDashApp;
use cache::{DataSource, DatasetCache};
use clap::Parser;
use cli::Cli;
use dashboard::Pipeline;
use data::filter::DateSelection;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.dump_specs {
        return dump_specs(&cli);
    }

    let initial = cli.has_range().then(|| cli.selection());
    let state = AppState::with_source(cli.data.clone(), initial);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Health Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(HealthDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}

/// Headless mode: run the pipeline once and print every section as JSON.
fn dump_specs(cli: &Cli) -> Result<()> {
    let source = DataSource::File(cli.data.clone());
    let mut cache = DatasetCache::default();
    let mut pipeline = Pipeline::default();
    let mut selection = DateSelection::default();

    let mut dashboard = pipeline
        .run(&mut cache, &source, &mut selection)
        .with_context(|| format!("loading {}", cli.data.display()))?;

    if cli.has_range() {
        let requested = cli.selection();
        selection.start = requested.start.or(selection.start);
        selection.end = requested.end.or(selection.end);
        dashboard = pipeline
            .run(&mut cache, &source, &mut selection)
            .with_context(|| format!("loading {}", cli.data.display()))?;
    }

    let json = serde_json::to_string_pretty(&dashboard.report(&source))
        .context("serialising chart specs")?;
    println!("{json}");
    Ok(())
}
