use std::fmt;

use serde::Serialize;

use crate::color::{Category, ClassifierSession, classify, fill_color};
use crate::data::model::{CellValue, Record};

/// Legend appended to every conclusion sentence.
pub const MARKER_LEGEND: &str =
    "Colors assigned: R=Red, B=Blue, Y=Yellow, N=Gray, others unique.";

/// Rendered in place of an extremum when no numeric data exists.
pub const NO_VALUE: &str = "no value";

/// Rendered in place of an extremum's location when no numeric data exists.
pub const NO_LABEL: &str = "-";

// ---------------------------------------------------------------------------
// Chart mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Line,
    Bar,
    Scatter,
    Pie,
    Doughnut,
}

impl ChartMode {
    pub const ALL: [ChartMode; 5] = [
        ChartMode::Line,
        ChartMode::Bar,
        ChartMode::Scatter,
        ChartMode::Pie,
        ChartMode::Doughnut,
    ];

    /// Whether each column collapses to a single total.
    pub fn is_aggregated(self) -> bool {
        matches!(self, ChartMode::Pie | ChartMode::Doughnut)
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartMode::Line => "Line",
            ChartMode::Bar => "Bar",
            ChartMode::Scatter => "Scatter",
            ChartMode::Pie => "Pie",
            ChartMode::Doughnut => "Doughnut",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesData {
    /// Raw cells, one per row, in row order.
    Points(Vec<CellValue>),
    /// Sum of the column's finite numbers.
    Total(f64),
}

/// One styled column of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub category: Category,
    pub border_color: String,
    pub fill_color: String,
    pub data: SeriesData,
}

/// Global extremes of the plotted values and where they occur.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryFacts {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub max_label: String,
    pub min_label: String,
}

impl SummaryFacts {
    fn empty() -> Self {
        SummaryFacts {
            max: None,
            min: None,
            max_label: NO_LABEL.to_string(),
            min_label: NO_LABEL.to_string(),
        }
    }
}

/// Everything a renderer needs for one generated chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOutput {
    pub mode: ChartMode,
    pub x_column: String,
    /// Stringified x value of every row.
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub summary: SummaryFacts,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build styled series and summary facts for the selected columns.
///
/// `y_columns` is expected non-empty and free of duplicates; the caller
/// validates the selection.  Malformed cells never fail the build, they only
/// drop out of the numeric computations.
pub fn build(
    rows: &[Record],
    x_column: &str,
    y_columns: &[String],
    mode: ChartMode,
) -> ChartOutput {
    let labels: Vec<String> = rows
        .iter()
        .map(|row| row.get(x_column).map(|v| v.to_string()).unwrap_or_default())
        .collect();

    let columns: Vec<Vec<CellValue>> = y_columns
        .iter()
        .map(|col| {
            rows.iter()
                .map(|row| row.get(col).cloned().unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    let mut session = ClassifierSession::new();
    let colors: Vec<_> = y_columns
        .iter()
        .map(|name| classify(name, &mut session))
        .collect();

    let (series, summary) = if mode.is_aggregated() {
        let totals: Vec<f64> = columns
            .iter()
            .map(Vec::as_slice)
            .map(column_total)
            .collect();
        let any_numeric = columns
            .iter()
            .flatten()
            .any(|cell| cell.as_number().is_some());
        let summary = if any_numeric {
            aggregated_summary(&totals, y_columns)
        } else {
            SummaryFacts::empty()
        };
        let data = totals.into_iter().map(SeriesData::Total).collect::<Vec<_>>();
        (data, summary)
    } else {
        let summary = per_point_summary(&columns, &labels);
        let data = columns.into_iter().map(SeriesData::Points).collect::<Vec<_>>();
        (data, summary)
    };

    let series = y_columns
        .iter()
        .zip(colors)
        .zip(series)
        .map(|((name, color), data)| Series {
            name: name.clone(),
            category: color.category,
            border_color: color.hex.to_string(),
            fill_color: fill_color(color.hex),
            data,
        })
        .collect();

    log::debug!(
        "built {mode} chart: {} rows, {} series, {} fallback colour(s)",
        rows.len(),
        y_columns.len(),
        session.fallbacks_used()
    );

    ChartOutput {
        mode,
        x_column: x_column.to_string(),
        labels,
        series,
        summary,
    }
}

/// Sum of a column, non-numeric cells counting as zero.
///
/// Starts from `+0.0`: an empty `f64` sum is `-0.0`, which would print as `-0`.
fn column_total(cells: &[CellValue]) -> f64 {
    cells
        .iter()
        .filter_map(CellValue::as_number)
        .fold(0.0, |acc, v| acc + v)
}

/// Max/min over column totals, located by the first column holding them.
fn aggregated_summary(totals: &[f64], y_columns: &[String]) -> SummaryFacts {
    let (Some(max), Some(min)) = (
        fold_max(totals.iter().copied()),
        fold_min(totals.iter().copied()),
    ) else {
        return SummaryFacts::empty();
    };
    let label_of = |v: f64| {
        totals
            .iter()
            .position(|&t| t == v)
            .and_then(|i| y_columns.get(i))
            .cloned()
            .unwrap_or_else(|| NO_LABEL.to_string())
    };
    SummaryFacts {
        max: Some(max),
        min: Some(min),
        max_label: label_of(max),
        min_label: label_of(min),
    }
}

/// Max/min over every numeric cell of every series.
///
/// Series are scanned in selection order, each top to bottom; the first
/// cell holding the extreme value names the row whose label is reported.
fn per_point_summary(columns: &[Vec<CellValue>], labels: &[String]) -> SummaryFacts {
    let pooled = || columns.iter().flatten().filter_map(CellValue::as_number);
    let (Some(max), Some(min)) = (fold_max(pooled()), fold_min(pooled())) else {
        return SummaryFacts::empty();
    };
    let label_of = |v: f64| {
        columns
            .iter()
            .find_map(|cells| cells.iter().position(|cell| cell.as_number() == Some(v)))
            .and_then(|row| labels.get(row))
            .cloned()
            .unwrap_or_else(|| NO_LABEL.to_string())
    };
    SummaryFacts {
        max: Some(max),
        min: Some(min),
        max_label: label_of(max),
        min_label: label_of(min),
    }
}

fn fold_max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.reduce(f64::max)
}

fn fold_min(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.reduce(f64::min)
}

// ---------------------------------------------------------------------------
// Conclusion text
// ---------------------------------------------------------------------------

fn format_extremum(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NO_VALUE.to_string(),
    }
}

/// Human-readable sentence describing the extremes, followed by the marker legend.
pub fn conclusion(summary: &SummaryFacts) -> String {
    format!(
        "Highest reading = {} at {}, Lowest reading = {} at {}. {MARKER_LEGEND}",
        format_extremum(summary.max),
        summary.max_label,
        format_extremum(summary.min),
        summary.min_label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{FALLBACK_PALETTE, RED_HEX};

    fn row(cells: &[(&str, CellValue)]) -> Record {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn num(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pie_sums_and_extremes() {
        let rows = vec![
            row(&[("t", num(1.0)), ("A", num(1.0)), ("B", num(10.0))]),
            row(&[("t", num(2.0)), ("A", num(2.0)), ("B", CellValue::Null)]),
            row(&[("t", num(3.0)), ("A", text("x")), ("B", num(5.0))]),
        ];
        let out = build(&rows, "t", &cols(&["A", "B"]), ChartMode::Pie);

        assert_eq!(out.series[0].data, SeriesData::Total(3.0));
        assert_eq!(out.series[1].data, SeriesData::Total(15.0));
        assert_eq!(out.summary.max, Some(15.0));
        assert_eq!(out.summary.max_label, "B");
        assert_eq!(out.summary.min, Some(3.0));
        assert_eq!(out.summary.min_label, "A");
        // Row labels are still produced in aggregated modes.
        assert_eq!(out.labels, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_aggregated_ties_go_to_first_column() {
        let rows = vec![row(&[("t", num(1.0)), ("A", num(4.0)), ("B", num(4.0))])];
        let out = build(&rows, "t", &cols(&["A", "B"]), ChartMode::Doughnut);
        assert_eq!(out.summary.max_label, "A");
        assert_eq!(out.summary.min_label, "A");
    }

    #[test]
    fn test_aggregated_all_text_columns_have_no_extremes() {
        let rows = vec![row(&[
            ("t", num(1.0)),
            ("A", text("x")),
            ("B", CellValue::Bool(true)),
        ])];
        let out = build(&rows, "t", &cols(&["A", "B"]), ChartMode::Pie);
        assert_eq!(out.series[1].data, SeriesData::Total(0.0));
        assert_eq!(out.summary, SummaryFacts::empty());
        assert!(conclusion(&out.summary)
            .starts_with("Highest reading = no value at -, Lowest reading = no value at -."));
    }

    #[test]
    fn test_text_column_totals_positive_zero() {
        let rows = vec![
            row(&[("t", num(1.0)), ("A", num(4.0)), ("B", text("n/a"))]),
            row(&[("t", num(2.0)), ("A", num(1.0)), ("B", CellValue::Null)]),
        ];
        let out = build(&rows, "t", &cols(&["A", "B"]), ChartMode::Doughnut);
        match out.series[1].data {
            SeriesData::Total(t) => assert!(t == 0.0 && t.is_sign_positive()),
            ref other => panic!("expected a total, got {other:?}"),
        }
        assert_eq!(out.summary.min, Some(0.0));
        assert_eq!(out.summary.min_label, "B");
        assert!(conclusion(&out.summary)
            .starts_with("Highest reading = 5 at A, Lowest reading = 0 at B."));
    }

    #[test]
    fn test_line_single_series_extremes() {
        let rows = vec![
            row(&[("time", text("t1")), ("temp", num(3.0))]),
            row(&[("time", text("t2")), ("temp", num(7.0))]),
            row(&[("time", text("t3")), ("temp", num(2.0))]),
        ];
        let out = build(&rows, "time", &cols(&["temp"]), ChartMode::Line);

        assert_eq!(out.labels, vec!["t1", "t2", "t3"]);
        assert_eq!(out.summary.max, Some(7.0));
        assert_eq!(out.summary.max_label, "t2");
        assert_eq!(out.summary.min, Some(2.0));
        assert_eq!(out.summary.min_label, "t3");
        assert_eq!(
            out.series[0].data,
            SeriesData::Points(vec![num(3.0), num(7.0), num(2.0)])
        );
    }

    #[test]
    fn test_bar_end_to_end_example() {
        let rows = vec![
            row(&[("time", num(1.0)), ("pressure", num(5.0)), ("flow (R)", num(2.0))]),
            row(&[("time", num(2.0)), ("pressure", num(9.0)), ("flow (R)", num(1.0))]),
        ];
        let out = build(&rows, "time", &cols(&["pressure", "flow (R)"]), ChartMode::Bar);

        assert_eq!(out.series[0].category, Category::Other);
        assert_eq!(out.series[0].border_color, FALLBACK_PALETTE[0]);
        assert_eq!(out.series[1].category, Category::Red);
        assert_eq!(out.series[1].border_color, RED_HEX);
        assert_eq!(out.series[1].fill_color, "#ff000066");
        assert_eq!(out.labels, vec!["1", "2"]);
        assert_eq!(out.summary.max, Some(9.0));
        assert_eq!(out.summary.max_label, "2");
        assert_eq!(out.summary.min, Some(1.0));
        assert_eq!(out.summary.min_label, "2");
    }

    #[test]
    fn test_location_is_the_row_within_its_series() {
        let rows = vec![
            row(&[("x", text("a")), ("p", num(1.0)), ("q", num(0.0))]),
            row(&[("x", text("b")), ("p", num(2.0)), ("q", num(8.0))]),
        ];
        let out = build(&rows, "x", &cols(&["p", "q"]), ChartMode::Line);
        assert_eq!(out.summary.min, Some(0.0));
        assert_eq!(out.summary.min_label, "a");
        assert_eq!(out.summary.max, Some(8.0));
        assert_eq!(out.summary.max_label, "b");
    }

    #[test]
    fn test_earlier_series_wins_ties() {
        let rows = vec![
            row(&[("x", text("a")), ("p", num(1.0)), ("q", num(5.0))]),
            row(&[("x", text("b")), ("p", num(5.0)), ("q", num(0.0))]),
        ];
        let out = build(&rows, "x", &cols(&["p", "q"]), ChartMode::Bar);
        assert_eq!(out.summary.max_label, "b");
    }

    #[test]
    fn test_non_numeric_cells_are_skipped_for_location() {
        let rows = vec![
            row(&[("x", text("a")), ("p", text("n/a"))]),
            row(&[("x", text("b")), ("p", num(4.0))]),
            row(&[("x", text("c")), ("p", num(1.0))]),
        ];
        let out = build(&rows, "x", &cols(&["p"]), ChartMode::Scatter);
        assert_eq!(out.summary.max_label, "b");
        assert_eq!(out.summary.min_label, "c");
    }

    #[test]
    fn test_no_numeric_data_yields_sentinels() {
        let rows = vec![
            row(&[("x", text("a")), ("p", text("n/a"))]),
            row(&[("x", text("b")), ("p", CellValue::Null)]),
        ];
        let out = build(&rows, "x", &cols(&["p"]), ChartMode::Line);
        assert_eq!(out.summary, SummaryFacts::empty());

        let text = conclusion(&out.summary);
        assert!(text.starts_with(
            "Highest reading = no value at -, Lowest reading = no value at -."
        ));
    }

    #[test]
    fn test_aggregated_without_rows_has_no_extremes() {
        let out = build(&[], "x", &cols(&["p"]), ChartMode::Pie);
        assert!(out.labels.is_empty());
        assert_eq!(out.series[0].data, SeriesData::Total(0.0));
        assert_eq!(out.summary.max, None);
        assert_eq!(out.summary.min, None);
        assert_eq!(out.summary.max_label, NO_LABEL);
        assert_eq!(out.summary.min_label, NO_LABEL);
    }

    #[test]
    fn test_missing_cells_read_as_null() {
        let rows = vec![row(&[("x", num(1.0))]), row(&[("p", num(3.0))])];
        let out = build(&rows, "x", &cols(&["p"]), ChartMode::Line);
        assert_eq!(out.labels, vec!["1", ""]);
        assert_eq!(
            out.series[0].data,
            SeriesData::Points(vec![CellValue::Null, num(3.0)])
        );
    }

    #[test]
    fn test_null_x_cell_labels_as_empty_string() {
        let rows = vec![
            row(&[("x", CellValue::Null), ("p", num(2.0))]),
            row(&[("x", text("b")), ("p", num(1.0))]),
        ];
        let out = build(&rows, "x", &cols(&["p"]), ChartMode::Line);
        assert_eq!(out.labels, vec!["", "b"]);
        assert_eq!(out.summary.max_label, "");
    }

    #[test]
    fn test_each_build_starts_a_fresh_palette() {
        let rows = vec![row(&[("x", num(1.0)), ("p", num(1.0)), ("q", num(2.0))])];
        let first = build(&rows, "x", &cols(&["p", "q"]), ChartMode::Line);
        let second = build(&rows, "x", &cols(&["q"]), ChartMode::Line);
        assert_eq!(first.series[1].border_color, FALLBACK_PALETTE[1]);
        assert_eq!(second.series[0].border_color, FALLBACK_PALETTE[0]);
    }

    #[test]
    fn test_conclusion_sentence() {
        let summary = SummaryFacts {
            max: Some(15.0),
            min: Some(2.5),
            max_label: "B".into(),
            min_label: "A".into(),
        };
        assert_eq!(
            conclusion(&summary),
            "Highest reading = 15 at B, Lowest reading = 2.5 at A. \
             Colors assigned: R=Red, B=Blue, Y=Yellow, N=Gray, others unique."
        );
    }

    #[test]
    fn test_output_serializes_to_json() {
        let rows = vec![row(&[("x", num(1.0)), ("p (B)", num(2.0))])];
        let out = build(&rows, "x", &cols(&["p (B)"]), ChartMode::Bar);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["mode"], "bar");
        assert_eq!(json["series"][0]["category"], "blue");
        assert_eq!(json["series"][0]["data"]["points"][0], 2.0);
    }
}
