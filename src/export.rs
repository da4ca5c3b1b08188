use std::path::Path;

use anyhow::{Context, Result};

use crate::chart::ChartOutput;

/// Write a generated chart (labels, styled series, summary) as pretty JSON.
pub fn write_chart_json(path: &Path, chart: &ChartOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(chart).context("serializing chart")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
