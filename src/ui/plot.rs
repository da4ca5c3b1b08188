use std::f64::consts::TAU;

use eframe::egui::{self, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::chart::{ChartMode, ChartOutput, Series, SeriesData};
use crate::color::{hex_to_color32, hex_to_fill_color32};
use crate::data::model::Dataset;
use crate::state::AppState;

/// Vertices per full turn when approximating pie arcs.
const ARC_STEPS: usize = 96;
/// Inner radius of a doughnut relative to its outer radius.
const DOUGHNUT_HOLE: f64 = 0.5;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the chart and the data preview in the central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to chart its columns  (File → Open…)");
        });
        return;
    };

    let plot_height = ui.available_height() * 0.65;
    match &state.chart {
        Some(chart) => chart_plot(ui, chart, plot_height),
        None => {
            ui.allocate_ui(egui::vec2(ui.available_width(), plot_height), |ui: &mut Ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.label("Pick an X column and Y columns, then press Generate.");
                });
            });
        }
    }

    ui.separator();
    data_table(ui, dataset);
}

fn chart_plot(ui: &mut Ui, chart: &ChartOutput, height: f32) {
    if chart.mode.is_aggregated() {
        pie_plot(ui, chart, height);
    } else {
        series_plot(ui, chart, height);
    }
}

// ---------------------------------------------------------------------------
// Per-point charts: line / scatter / bar
// ---------------------------------------------------------------------------

/// Numeric points of a series against row index; `None` marks a gap.
fn row_points(series: &Series) -> Vec<Option<[f64; 2]>> {
    match &series.data {
        SeriesData::Points(cells) => cells
            .iter()
            .enumerate()
            .map(|(i, cell)| cell.as_number().map(|v| [i as f64, v]))
            .collect(),
        SeriesData::Total(_) => Vec::new(),
    }
}

fn series_plot(ui: &mut Ui, chart: &ChartOutput, height: f32) {
    let labels = chart.labels.clone();
    let n_series = chart.series.len().max(1) as f64;
    let bar_width = 0.8 / n_series;

    Plot::new("chart_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(chart.x_column.clone())
        .y_axis_label("Values")
        .x_axis_formatter(move |mark: GridMark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (s_idx, series) in chart.series.iter().enumerate() {
                let border = hex_to_color32(&series.border_color);
                let points = row_points(series);

                match chart.mode {
                    ChartMode::Bar => {
                        let offset = (s_idx as f64 - (n_series - 1.0) / 2.0) * bar_width;
                        let fill = hex_to_fill_color32(&series.border_color);
                        let bars: Vec<Bar> = points
                            .iter()
                            .flatten()
                            .map(|[x, y]| {
                                Bar::new(x + offset, *y)
                                    .width(bar_width)
                                    .fill(fill)
                                    .stroke(Stroke::new(1.0, border))
                            })
                            .collect();
                        plot_ui.bar_chart(BarChart::new(bars).name(&series.name).color(border));
                    }
                    ChartMode::Scatter => {
                        let pts: PlotPoints = points.iter().flatten().copied().collect();
                        plot_ui.points(
                            Points::new(pts)
                                .name(&series.name)
                                .color(border)
                                .radius(3.0),
                        );
                    }
                    _ => {
                        // Missing values break the line into separate runs.
                        for run in points.split(Option::is_none).filter(|r| !r.is_empty()) {
                            let pts: PlotPoints = run.iter().flatten().copied().collect();
                            plot_ui.line(
                                Line::new(pts)
                                    .name(&series.name)
                                    .color(border)
                                    .width(2.0),
                            );
                        }
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Aggregated charts: pie / doughnut
// ---------------------------------------------------------------------------

/// Convex pieces covering one slice between angles `start` and `end` (radians).
///
/// Plot polygons are filled as convex shapes, so a slice is split into one
/// wedge (or ring segment, when `inner > 0`) per arc step.
fn slice_pieces(start: f64, end: f64, inner: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = (((end - start) / TAU) * ARC_STEPS as f64).ceil().max(1.0) as usize;
    let at = |r: f64, i: usize| {
        let a = start + (end - start) * i as f64 / steps as f64;
        [r * a.cos(), r * a.sin()]
    };

    (0..steps)
        .map(|i| {
            if inner > 0.0 {
                vec![at(1.0, i), at(1.0, i + 1), at(inner, i + 1), at(inner, i)]
            } else {
                vec![at(1.0, i), at(1.0, i + 1), [0.0, 0.0]]
            }
        })
        .collect()
}

fn pie_plot(ui: &mut Ui, chart: &ChartOutput, height: f32) {
    let totals: Vec<(&Series, f64)> = chart
        .series
        .iter()
        .filter_map(|s| match s.data {
            SeriesData::Total(t) if t > 0.0 => Some((s, t)),
            _ => None,
        })
        .collect();
    let grand_total: f64 = totals.iter().map(|(_, t)| t).sum();
    let inner = if chart.mode == ChartMode::Doughnut {
        DOUGHNUT_HOLE
    } else {
        0.0
    };

    Plot::new("pie_plot")
        .height(height)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            if grand_total <= 0.0 {
                return;
            }
            // Clockwise from twelve o'clock.
            let mut angle = TAU / 4.0;
            for (series, total) in &totals {
                let sweep = total / grand_total * TAU;
                let color = hex_to_color32(&series.border_color);
                for piece in slice_pieces(angle - sweep, angle, inner) {
                    let piece: PlotPoints = piece.into();
                    plot_ui.polygon(
                        Polygon::new(piece)
                            .name(&series.name)
                            .fill_color(color)
                            .stroke(Stroke::new(0.5, color)),
                    );
                }
                angle -= sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Data preview
// ---------------------------------------------------------------------------

fn data_table(ui: &mut Ui, dataset: &Dataset) {
    let columns = &dataset.column_names;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), columns.len())
        .header(20.0, |mut header| {
            for name in columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, dataset.len(), |mut row| {
                let idx = row.index();
                for name in columns {
                    row.col(|ui: &mut Ui| {
                        ui.label(dataset.cell(idx, name).to_string());
                    });
                }
            });
        });
}
