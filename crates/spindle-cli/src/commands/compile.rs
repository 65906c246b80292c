//! Compile command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;

use spindle_compile::Compiler;
use spindle_ir::Circuit;

use super::common::load_graph;

/// Execute the compile command.
///
/// Every component is compiled separately; the output is a JSON array
/// with one scheduled circuit per component.
pub fn execute(input: &str, output: Option<&str>) -> Result<()> {
    let graph = load_graph(input)?;
    let compiler = Compiler::new(&graph);

    let circuits = compiler
        .components()?
        .iter()
        .map(|component| compiler.compile_component(component))
        .collect::<Result<Vec<Circuit>, _>>()?;

    eprintln!(
        "{} Compiled {} into {} component(s)",
        style("✓").green().bold(),
        style(input).green(),
        circuits.len()
    );
    for (i, circuit) in circuits.iter().enumerate() {
        eprintln!(
            "  [{i}] {} qubits, {} clbits, depth {}, {} gates",
            circuit.num_qubits,
            circuit.num_clbits,
            circuit.depth(),
            circuit.gate_count()
        );
    }

    let json = serde_json::to_string_pretty(&circuits)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write file: {path}"))?;
            eprintln!("  Written to {}", style(path).cyan());
        }
        None => println!("{json}"),
    }

    Ok(())
}
