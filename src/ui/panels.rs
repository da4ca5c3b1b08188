use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::ChartMode;
use crate::color::hex_to_color32;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – column selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Columns");
    ui.separator();

    let columns = match &state.dataset {
        Some(ds) => ds.column_names.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- X axis ----
            ui.strong("X axis");
            let current_x = state.x_column.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("x_column")
                .selected_text(&current_x)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &columns {
                        if ui.selectable_label(current_x == *col, col).clicked() {
                            state.x_column = Some(col.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Y axis ----
            ui.horizontal(|ui: &mut Ui| {
                ui.strong("Y axis");
                if ui.small_button("All").clicked() {
                    state.select_all_y();
                }
                if ui.small_button("None").clicked() {
                    state.select_none_y();
                }
            });

            for col in &columns {
                // Tint with the colour the last generate assigned.
                let mut text = RichText::new(col);
                if let Some(hex) = state.series_color(col) {
                    text = text.color(hex_to_color32(hex));
                }

                let mut checked = state.y_checked.contains(col);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_y(col);
                }
            }
            ui.separator();

            if ui.button("Generate chart").clicked() {
                state.generate();
            }

            if let Some(text) = state.conclusion() {
                ui.add_space(8.0);
                ui.strong("Conclusion");
                ui.label(text);
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
            if ui
                .add_enabled(state.chart.is_some(), egui::Button::new("Export chart JSON…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        egui::ComboBox::from_id_salt("chart_mode")
            .selected_text(state.mode.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for mode in ChartMode::ALL {
                    ui.selectable_value(&mut state.mode, mode, mode.to_string());
                }
            });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows, {} columns",
                ds.len(),
                ds.column_names.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let Some(chart) = &state.chart else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export chart")
        .set_file_name("chart.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match crate::export::write_chart_json(&path, chart) {
            Ok(()) => {
                log::info!("Exported chart to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export chart: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
