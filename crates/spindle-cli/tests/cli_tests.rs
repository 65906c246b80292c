//! CLI command parsing and utility tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`), graph
//! documents loaded from disk, and the run path end to end.

// The CLI is a binary crate, so these tests exercise the equivalent logic
// through the library crates and mirror the clap structs.

// ============================================================================
// Graph loading tests
// ============================================================================

mod graph_loading {
    use spindle_ir::{GraphDocument, IrError};
    use std::fs;

    const BELL: &str = r#"{ "statements": [
        { "register": { "kind": "qubit", "start": 0, "count": 2 } },
        { "op": { "name": "H", "qubits": [0] } },
        { "op": { "name": "CNOT", "qubits": [0, 1] } }
    ] }"#;

    #[test]
    fn test_load_graph_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bell.json");
        fs::write(&path, BELL).unwrap();

        let source = fs::read_to_string(&path).unwrap();
        let dag = GraphDocument::from_json(&source).unwrap().build().unwrap();
        assert_eq!(dag.num_qubits(), 2);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_document() {
        let result = GraphDocument::from_json("this is not json");
        assert!(matches!(result, Err(IrError::Document(_))));
    }

    #[test]
    fn test_operation_on_undeclared_qubit() {
        let json = r#"{ "statements": [
            { "register": { "kind": "qubit", "start": 0, "count": 1 } },
            { "op": { "name": "H", "qubits": [3] } }
        ] }"#;
        let result = GraphDocument::from_json(json).unwrap().build();
        assert!(result.is_err());
    }
}

// ============================================================================
// Run and compile paths
// ============================================================================

mod execution {
    use spindle_adapter_sim::SimulatorBackend;
    use spindle_compile::Compiler;
    use spindle_hal::{Backend, ExecuteOptions};
    use spindle_ir::{Circuit, GraphDocument};

    const TELEPORT_BIT: &str = r#"{ "statements": [
        { "register": { "kind": "qubit", "start": 0, "count": 2 } },
        { "register": { "kind": "clbit", "start": 0, "count": 1 } },
        { "op": { "name": "X", "qubits": [0] } },
        { "op": { "name": "MEASURE", "qubits": [0], "clbits": [0] } },
        { "op": { "name": "X", "qubits": [1],
                  "condition": { "clbits": [0], "cmp": "==", "value": 1 } } }
    ] }"#;

    #[test]
    fn test_run_document() {
        let dag = GraphDocument::from_json(TELEPORT_BIT)
            .unwrap()
            .build()
            .unwrap();
        let result = SimulatorBackend::new()
            .execute(&dag, &ExecuteOptions::new().with_shots(10).with_mqubits([1]))
            .unwrap();
        assert_eq!(result.counts().get("1"), Some(&10));
    }

    #[test]
    fn test_compile_output_round_trips() {
        let dag = GraphDocument::from_json(TELEPORT_BIT)
            .unwrap()
            .build()
            .unwrap();
        let compiler = Compiler::new(&dag);
        let circuits = compiler
            .components()
            .unwrap()
            .iter()
            .map(|c| compiler.compile_component(c).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(circuits.len(), 1);

        let json = serde_json::to_string_pretty(&circuits).unwrap();
        let back: Vec<Circuit> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuits);
        assert!(json.contains("MEASURE"));
    }

    #[test]
    fn test_demo_graphs_run() {
        let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        for name in ["bell.json", "feedforward.json", "macros.json"] {
            let source = std::fs::read_to_string(demos.join(name)).unwrap();
            let dag = GraphDocument::from_json(&source).unwrap().build().unwrap();
            let sequential = SimulatorBackend::new()
                .execute(&dag, &ExecuteOptions::default())
                .unwrap();
            let parallel = SimulatorBackend::new()
                .execute(&dag, &ExecuteOptions::new().with_parallel(true))
                .unwrap();
            assert_eq!(sequential.counts().values().sum::<u32>(), 1024, "{name}");
            assert_eq!(sequential.counts(), parallel.counts(), "{name}");
        }
    }

    #[test]
    fn test_result_report_fields() {
        let dag = GraphDocument::from_json(TELEPORT_BIT)
            .unwrap()
            .build()
            .unwrap();
        let result = SimulatorBackend::new()
            .execute(&dag, &ExecuteOptions::default())
            .unwrap();
        let report = serde_json::json!({
            "shots": result.shots,
            "probabilities": &result.probabilities,
            "counts": result.counts(),
        });
        assert_eq!(report["counts"]["11"], 1024);
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "spindle")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Compile {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            output: Option<String>,
        },
        Run {
            #[arg(short, long)]
            input: String,
            #[arg(short, long, default_value = "1024")]
            shots: u32,
            #[arg(long, value_delimiter = ',')]
            mqubits: Vec<usize>,
            #[arg(long)]
            parallel: bool,
            #[arg(long)]
            print_circuit: bool,
            #[arg(short, long, default_value = "table")]
            format: String,
        },
        Version,
    }

    // --- Compile command ---

    #[test]
    fn test_parse_compile_minimal() {
        let cli = TestCli::try_parse_from(["spindle", "compile", "-i", "graph.json"]).unwrap();
        match cli.command {
            TestCommands::Compile { input, output } => {
                assert_eq!(input, "graph.json");
                assert!(output.is_none());
            }
            _ => panic!("Expected Compile command"),
        }
    }

    #[test]
    fn test_parse_compile_missing_input() {
        let result = TestCli::try_parse_from(["spindle", "compile"]);
        assert!(result.is_err());
    }

    // --- Run command ---

    #[test]
    fn test_parse_run_minimal() {
        let cli = TestCli::try_parse_from(["spindle", "run", "-i", "bell.json"]).unwrap();
        match cli.command {
            TestCommands::Run {
                input,
                shots,
                mqubits,
                parallel,
                print_circuit,
                format,
            } => {
                assert_eq!(input, "bell.json");
                assert_eq!(shots, 1024);
                assert!(mqubits.is_empty());
                assert!(!parallel);
                assert!(!print_circuit);
                assert_eq!(format, "table");
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_with_all_args() {
        let cli = TestCli::try_parse_from([
            "spindle",
            "-vv",
            "run",
            "-i",
            "graph.json",
            "-s",
            "500",
            "--mqubits",
            "0,2",
            "--parallel",
            "--print-circuit",
            "-f",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            TestCommands::Run {
                shots,
                mqubits,
                parallel,
                print_circuit,
                format,
                ..
            } => {
                assert_eq!(shots, 500);
                assert_eq!(mqubits, vec![0, 2]);
                assert!(parallel);
                assert!(print_circuit);
                assert_eq!(format, "json");
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_bad_shots() {
        let result = TestCli::try_parse_from(["spindle", "run", "-i", "g.json", "-s", "many"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_version() {
        let cli = TestCli::try_parse_from(["spindle", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = TestCli::try_parse_from(["spindle", "version", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }
}
