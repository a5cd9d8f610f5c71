use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use manpage_schema_core::{ToolCollection, ToolSchema};
use manpage_schema_discovery::config::{Dialect, EngineConfig};
use manpage_schema_discovery::extractor::extract_many;
use manpage_schema_discovery::output::{
    AppendOutcome, OutputFormat, append_to_collection, render_collection, render_tool,
};
use manpage_schema_discovery::parse_man_page_with;

#[derive(Debug, Parser)]
#[command(name = "man2json")]
#[command(version)]
#[command(about = "Convert man pages to structured JSON tool schemas")]
struct Cli {
    /// Commands whose manual pages to convert.
    #[arg(required = true, value_name = "COMMAND")]
    commands: Vec<String>,
    /// JSON file to append tools to (created when missing).
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
    /// Stdout format when no output file is given.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
    /// Parse a saved manual page instead of retrieving one (single command).
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Do not fall back to the remote man-page site.
    #[arg(long)]
    no_web: bool,
    /// Do not run the local `man` viewer.
    #[arg(long)]
    no_local: bool,
    /// YAML engine configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let directive = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<EngineConfig, String> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => EngineConfig::default(),
    };
    if cli.no_web {
        config.retrieval.web = false;
    }
    if cli.no_local {
        config.retrieval.local = false;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli)?;

    let results = match &cli.input {
        Some(path) => {
            let [command] = cli.commands.as_slice() else {
                return Err("--input requires exactly one command".to_string());
            };
            vec![(command.clone(), parse_input_file(command, path, &config)?)]
        }
        None => collect_results(
            extract_many(&cli.commands, &config).map_err(|err| err.to_string())?,
        ),
    };

    let failed = cli.commands.len() - results.len();
    let tools = results.into_iter().map(|(_, tool)| tool).collect::<Vec<_>>();

    if let Some(path) = &cli.output {
        for tool in &tools {
            write_to_collection(path, tool, cli.pretty)?;
        }
    } else if !tools.is_empty() {
        let rendered = if cli.commands.len() == 1 {
            render_tool(&tools[0], cli.format, cli.pretty)
        } else {
            render_collection(&ToolCollection::new(tools), cli.format, cli.pretty)
        }
        .map_err(|err| format!("Failed to render output: {err}"))?;
        println!("{rendered}");
    }

    if failed > 0 {
        return Err(format!("{failed} of {} command(s) failed", cli.commands.len()));
    }
    Ok(())
}

fn parse_input_file(command: &str, path: &Path, config: &EngineConfig) -> Result<ToolSchema, String> {
    let raw = fs::read(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    let dialect = Dialect::compile(&config.dialect).map_err(|err| err.to_string())?;
    debug!(command, path = %path.display(), bytes = raw.len(), "Parsing saved man page");
    Ok(parse_man_page_with(
        command,
        &String::from_utf8_lossy(&raw),
        &dialect,
    ))
}

/// Reports per-command failures and keeps the successes in input order.
fn collect_results(
    results: Vec<(String, manpage_schema_discovery::Result<ToolSchema>)>,
) -> Vec<(String, ToolSchema)> {
    results
        .into_iter()
        .filter_map(|(command, result)| match result {
            Ok(tool) => Some((command, tool)),
            Err(err) => {
                eprintln!("error: {command}: {err}");
                None
            }
        })
        .collect()
}

fn write_to_collection(path: &Path, tool: &ToolSchema, pretty: bool) -> Result<(), String> {
    let outcome = append_to_collection(path, tool, pretty)
        .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
    match outcome {
        AppendOutcome::Created => eprintln!("Created {} with {}", path.display(), tool.name),
        AppendOutcome::Appended(_) => eprintln!("Appended {} to {}", tool.name, path.display()),
    }
    Ok(())
}
