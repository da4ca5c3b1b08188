use std::collections::BTreeSet;

use thiserror::Error;

/// Why a chart cannot be generated from the current choices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select an X-axis column")]
    MissingXColumn,
    #[error("Please select at least one Y-axis column")]
    NoYColumns,
}

/// A validated choice of axis column and value columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub x_column: String,
    /// Non-empty, no duplicates, in the order they were given.
    pub y_columns: Vec<String>,
}

impl Selection {
    pub fn new<'a>(
        x_column: Option<&str>,
        y_columns: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, SelectionError> {
        let x_column = match x_column {
            Some(x) if !x.is_empty() => x.to_string(),
            _ => return Err(SelectionError::MissingXColumn),
        };

        let mut seen = BTreeSet::new();
        let y_columns: Vec<String> = y_columns
            .into_iter()
            .filter(|y| !y.is_empty() && seen.insert(*y))
            .map(str::to_string)
            .collect();
        if y_columns.is_empty() {
            return Err(SelectionError::NoYColumns);
        }

        Ok(Selection { x_column, y_columns })
    }

    /// Selection from ticked checkboxes, ordered as the columns appear in the table.
    pub fn from_checked(
        x_column: Option<&str>,
        column_names: &[String],
        checked: &BTreeSet<String>,
    ) -> Result<Self, SelectionError> {
        Self::new(
            x_column,
            column_names
                .iter()
                .filter(|c| checked.contains(*c))
                .map(String::as_str),
        )
    }
}
