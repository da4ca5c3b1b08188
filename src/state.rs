use std::collections::BTreeSet;

use crate::chart::{self, ChartMode, ChartOutput};
use crate::data::model::Dataset;
use crate::selection::Selection;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Column plotted along the x axis.
    pub x_column: Option<String>,

    /// Value columns ticked by the user.
    pub y_checked: BTreeSet<String>,

    /// Chart type used on the next generate.
    pub mode: ChartMode,

    /// Result of the last successful generate.
    pub chart: Option<ChartOutput>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset all selections.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        // Default x column: first column (if any).
        self.x_column = dataset.column_names.first().cloned();
        self.y_checked.clear();
        self.chart = None;
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Tick or untick a value column.
    pub fn toggle_y(&mut self, column: &str) {
        if !self.y_checked.remove(column) {
            self.y_checked.insert(column.to_string());
        }
    }

    /// Tick every column except the x column.
    pub fn select_all_y(&mut self) {
        if let Some(ds) = &self.dataset {
            self.y_checked = ds
                .column_names
                .iter()
                .filter(|c| Some(c.as_str()) != self.x_column.as_deref())
                .cloned()
                .collect();
        }
    }

    /// Untick every value column.
    pub fn select_none_y(&mut self) {
        self.y_checked.clear();
    }

    /// Build a chart from the current choices, replacing the previous one.
    ///
    /// Invalid choices leave the previous chart in place and set the status
    /// message instead.
    pub fn generate(&mut self) {
        let Some(ds) = &self.dataset else {
            self.status_message = Some("Open a file first".to_string());
            return;
        };

        let selection = match Selection::from_checked(
            self.x_column.as_deref(),
            &ds.column_names,
            &self.y_checked,
        ) {
            Ok(sel) => sel,
            Err(e) => {
                log::warn!("Cannot generate chart: {e}");
                self.status_message = Some(e.to_string());
                return;
            }
        };

        let output = chart::build(
            &ds.rows,
            &selection.x_column,
            &selection.y_columns,
            self.mode,
        );
        log::info!(
            "Generated {} chart of {:?} against {}",
            output.mode,
            selection.y_columns,
            selection.x_column
        );
        self.chart = Some(output);
        self.status_message = None;
    }

    /// Conclusion sentence for the current chart.
    pub fn conclusion(&self) -> Option<String> {
        self.chart.as_ref().map(|c| chart::conclusion(&c.summary))
    }

    /// Border colour assigned to `column` in the current chart.
    pub fn series_color(&self, column: &str) -> Option<&str> {
        self.chart
            .as_ref()?
            .series
            .iter()
            .find(|s| s.name == column)
            .map(|s| s.border_color.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RED_HEX;
    use crate::data::model::{CellValue, Record};

    fn dataset() -> Dataset {
        let header: Vec<String> = ["time", "pressure", "flow (R)"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows: Vec<Record> = [[1.0, 5.0, 2.0], [2.0, 9.0, 1.0]]
            .iter()
            .map(|vals| {
                header
                    .iter()
                    .cloned()
                    .zip(vals.iter().map(|&v| CellValue::Number(v)))
                    .collect()
            })
            .collect();
        Dataset::from_rows(&header, rows)
    }

    #[test]
    fn test_set_dataset_defaults_x_to_first_column() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.x_column.as_deref(), Some("time"));
        assert!(state.y_checked.is_empty());
    }

    #[test]
    fn test_generate_without_dataset_reports_status() {
        let mut state = AppState::default();
        state.generate();
        assert!(state.chart.is_none());
        assert_eq!(state.status_message.as_deref(), Some("Open a file first"));
    }

    #[test]
    fn test_generate_without_y_columns_reports_status() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.generate();
        assert!(state.chart.is_none());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Please select at least one Y-axis column")
        );
    }

    #[test]
    fn test_generate_builds_chart_and_conclusion() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.toggle_y("flow (R)");
        state.toggle_y("pressure");
        state.mode = ChartMode::Bar;
        state.generate();

        let chart = state.chart.as_ref().unwrap();
        // Column order, not click order.
        assert_eq!(chart.series[0].name, "pressure");
        assert_eq!(state.series_color("flow (R)"), Some(RED_HEX));
        assert!(state
            .conclusion()
            .unwrap()
            .starts_with("Highest reading = 9 at 2, Lowest reading = 1 at 2."));
    }

    #[test]
    fn test_toggle_and_bulk_selection() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.toggle_y("pressure");
        state.toggle_y("pressure");
        assert!(state.y_checked.is_empty());

        state.select_all_y();
        assert_eq!(state.y_checked.len(), 2);
        assert!(!state.y_checked.contains("time"));

        state.select_none_y();
        assert!(state.y_checked.is_empty());
    }

    #[test]
    fn test_new_dataset_discards_chart() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.select_all_y();
        state.generate();
        assert!(state.chart.is_some());

        state.set_dataset(dataset());
        assert!(state.chart.is_none());
        assert!(state.conclusion().is_none());
    }
}
