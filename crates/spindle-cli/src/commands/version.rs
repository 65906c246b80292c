//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - circuit-graph compiler and branching simulator",
        style("Spindle").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  spindle-ir           Circuit graphs, gates and scheduled circuits");
    println!("  spindle-compile      Decomposition, list scheduling, macro expansion");
    println!("  spindle-hal          Execution options, results, shot apportionment");
    println!("  spindle-adapter-sim  Branching statevector simulator");
    println!("  spindle-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
