//! Command-line front end: read a description, lay it out, write JSON.

use std::{fs, io::Write, path::PathBuf};

use clap::Parser;
use log::{info, warn};

use crate::config::load_config;
use crate::description::Description;
use crate::diagnostics::Diagnostics;
use crate::error::SwimflowError;
use crate::layout::{Layout, LayoutEngine};

/// Command-line arguments for the swimlane layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input process description (JSON)
    pub input: PathBuf,

    /// Path to the output layout file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Pretty-print the layout JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Lay out `source` with the configuration named by `args`.
pub fn layout_source(args: &Args, source: &str) -> Result<Layout, SwimflowError> {
    let app_config = load_config(args.config.as_ref())?;
    let mut config_diagnostics = Diagnostics::new();
    let engine = LayoutEngine::new(app_config.layout_config(&mut config_diagnostics));

    let desc = Description::from_json(source)?;
    let mut layout = engine.layout_description(&desc);

    config_diagnostics.extend(layout.diagnostics);
    layout.diagnostics = config_diagnostics;
    Ok(layout)
}

/// Run the CLI.
///
/// # Errors
///
/// Returns `SwimflowError` for file I/O, config loading and JSON syntax
/// errors. Layout problems are reported as warnings only.
pub fn run(args: &Args) -> Result<(), SwimflowError> {
    info!(input_path = args.input.display().to_string(); "Processing description");

    let source = fs::read_to_string(&args.input)?;
    let layout = layout_source(args, &source)?;
    if !layout.diagnostics.is_empty() {
        warn!(count = layout.diagnostics.len(); "Layout finished with diagnostics");
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&layout)?
    } else {
        serde_json::to_string(&layout)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output_file = path.display().to_string(); "Layout written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"{
        "bands": [{"id": "a", "label": "A"}],
        "nodes": [
            {"id": "s", "kind": "startEvent", "band": "a"},
            {"id": "t", "kind": "task", "band": "a", "label": "Do it"}
        ],
        "edges": [{"from": "s", "to": "t"}]
    }"#;

    fn args(dir: &tempfile::TempDir) -> Args {
        Args {
            input: dir.path().join("in.json"),
            output: Some(dir.path().join("out.json")),
            config: None,
            log_level: "info".to_string(),
            pretty: false,
        }
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["swimflow", "in.json", "-o", "out.json", "--pretty"]);
        assert_eq!(args.input, PathBuf::from("in.json"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(args.pretty);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_run_writes_layout() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&dir);
        fs::write(&args.input, INPUT).unwrap();

        run(&args).unwrap();

        let out = fs::read_to_string(dir.path().join("out.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"][0]["from"], "s");
        assert!(value["diagnostics"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_config_file_then_description_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("swimflow.toml");
        fs::write(&config_path, "[layout]\ncolumn_gap = 300.0\npadding_x = 100.0\n").unwrap();
        let mut args = args(&dir);
        args.config = Some(config_path);

        let source = r#"{
            "layout": {"paddingX": 50},
            "nodes": [{"id": "s", "kind": "startEvent"}, {"id": "t", "kind": "task"}],
            "edges": [{"from": "s", "to": "t"}]
        }"#;
        let layout = layout_source(&args, source).unwrap();
        // x = label width + description padding + one file-configured gap
        assert_eq!(layout.node("t").unwrap().x, 150.0 + 50.0 + 300.0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&dir);
        fs::write(&args.input, "{ not json").unwrap();
        assert!(matches!(run(&args), Err(SwimflowError::Json(_))));
    }

    #[test]
    fn test_missing_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&dir);
        assert!(matches!(run(&args), Err(SwimflowError::Io(_))));
    }
}
