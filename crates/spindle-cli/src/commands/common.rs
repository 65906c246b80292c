//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use spindle_hal::ExecutionResult;
use spindle_ir::{GraphDag, GraphDocument};

/// Load a circuit graph from a JSON graph document.
pub fn load_graph(path: &str) -> Result<GraphDag> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let document = GraphDocument::from_json(&source)
        .map_err(|e| anyhow::anyhow!("Parse error: {e}"))?;
    document
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid graph: {e}"))
}

/// Serializable view of an [`ExecutionResult`].
#[derive(Debug, Serialize)]
pub struct ResultReport<'a> {
    pub shots: u32,
    pub probabilities: &'a BTreeMap<String, f64>,
    pub counts: &'a BTreeMap<String, u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl<'a> From<&'a ExecutionResult> for ResultReport<'a> {
    fn from(result: &'a ExecutionResult) -> Self {
        Self {
            shots: result.shots,
            probabilities: &result.probabilities,
            counts: result.counts(),
            execution_time_ms: result.execution_time_ms,
        }
    }
}

/// Outcomes ordered by descending count, then key.
pub fn sorted_counts(result: &ExecutionResult) -> Vec<(&String, u32)> {
    let mut sorted: Vec<_> = result.counts().iter().map(|(k, c)| (k, *c)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted
}

/// Print execution results in a table format.
pub fn print_results(result: &ExecutionResult) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );

    let sorted = sorted_counts(result);
    for (bitstring, count) in sorted.iter().take(16) {
        let prob = result.probabilities.get(*bitstring).copied().unwrap_or(0.0) * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    if let Some(time_ms) = result.execution_time_ms {
        println!("\n  Execution time: {} ms", style(time_ms).yellow());
    }
}
