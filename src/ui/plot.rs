use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::SeriesColors;
use crate::data::chart::{x_to_date, ChartSpec};

// ---------------------------------------------------------------------------
// Line chart for one ChartSpec
// ---------------------------------------------------------------------------

fn format_x(x: f64) -> String {
    x_to_date(x)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Render one chart. Each run of present values is its own line, so
/// missing readings show as gaps; every reading also gets a marker so
/// isolated values stay visible.
pub fn line_chart(ui: &mut Ui, spec: &ChartSpec, id: usize) {
    let colors = SeriesColors::new(&spec.y_columns);

    ui.strong(&spec.title);
    if spec.series.iter().all(|s| s.present_count() == 0) {
        ui.label(RichText::new("No readings in the selected range.").weak());
    }

    Plot::new(("line_chart", id))
        .height(280.0)
        .legend(Legend::default())
        .x_axis_label(spec.x_column.clone())
        .y_axis_label(spec.y_label.clone())
        .x_axis_formatter(|mark, _range| format_x(mark.value))
        .label_formatter(|name, value| {
            let date = format_x(value.x);
            if name.is_empty() {
                format!("{date}\n{:.2}", value.y)
            } else {
                format!("{name}\n{date}\n{:.2}", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &spec.series {
                let color = colors.color_for(&series.column);

                for segment in series.segments() {
                    if segment.len() > 1 {
                        let line = Line::new(PlotPoints::from(segment.clone()))
                            .name(&series.column)
                            .color(color)
                            .width(1.5);
                        plot_ui.line(line);
                    }

                    let markers = Points::new(PlotPoints::from(segment))
                        .name(&series.column)
                        .color(color)
                        .radius(2.5);
                    plot_ui.points(markers);
                }
            }
        });

    ui.add_space(8.0);
}
