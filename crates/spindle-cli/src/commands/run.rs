//! Run command implementation.

use anyhow::Result;
use console::style;
use tracing::debug;

use spindle_adapter_sim::SimulatorBackend;
use spindle_hal::{Backend, ExecuteOptions};

use super::common::{ResultReport, load_graph, print_results};

/// Arguments of the run command.
pub struct RunArgs<'a> {
    pub input: &'a str,
    pub shots: u32,
    pub mqubits: Vec<usize>,
    pub parallel: bool,
    pub print_circuit: bool,
    pub history: bool,
    pub format: &'a str,
}

/// Execute the run command.
pub fn execute(args: &RunArgs<'_>) -> Result<()> {
    let table = match args.format.to_lowercase().as_str() {
        "table" => true,
        "json" => false,
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    };

    let graph = load_graph(args.input)?;
    if table {
        println!(
            "{} Running {} ({} shots)",
            style("→").cyan().bold(),
            style(args.input).green(),
            args.shots
        );
        println!(
            "  Loaded: {} qubits, {} clbits",
            graph.num_qubits(),
            graph.num_clbits()
        );
    }

    let options = ExecuteOptions::new()
        .with_shots(args.shots)
        .with_mqubits(args.mqubits.iter().copied())
        .with_parallel(args.parallel)
        .with_print_circuit(args.print_circuit)
        .with_verbose(args.history);

    debug!("Execute options: {options:?}");
    let backend = SimulatorBackend::new();
    let result = backend.execute(&graph, &options)?;

    if table {
        print_results(&result);
    } else {
        let report = ResultReport::from(&result);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
