//! Spindle Command-Line Interface
//!
//! The main entry point for the `spindle` tool.
//!
//! ```text
//! spindle run -i graph.json --shots 2048 --mqubits 0,2
//! spindle compile -i graph.json -o circuits.json
//! spindle version
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{compile, run, version};

/// Spindle - circuit-graph compiler and branching statevector simulator
#[derive(Parser)]
#[command(name = "spindle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a circuit graph into scheduled circuits
    Compile {
        /// Input graph document (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compile and simulate a circuit graph
    Run {
        /// Input graph document (JSON)
        #[arg(short, long)]
        input: String,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u32,

        /// Qubit positions kept in result keys (all if omitted)
        #[arg(long, value_delimiter = ',')]
        mqubits: Vec<usize>,

        /// Simulate independent components concurrently
        #[arg(long)]
        parallel: bool,

        /// Log the compiled circuit
        #[arg(long)]
        print_circuit: bool,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Compile { input, output } => compile::execute(&input, output.as_deref()),

        Commands::Run {
            input,
            shots,
            mqubits,
            parallel,
            print_circuit,
            format,
        } => run::execute(&run::RunArgs {
            input: &input,
            shots,
            mqubits,
            parallel,
            print_circuit,
            history: cli.verbose >= 2,
            format: &format,
        }),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
