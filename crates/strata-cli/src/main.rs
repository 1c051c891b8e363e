//! Command-line inspector for layered key-value stacks.

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde_json::Value;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use strata_core::{LayeredStack, StackOptions};

/// Command-line options for the stack inspector.
#[derive(Parser, Debug)]
#[command(name = "strata", version)]
struct Cli {
    /// Optional JSON5 file with stack options (`caseSensitive`, `layers`)
    #[arg(long)]
    options: Option<PathBuf>,
    /// Fold keys to lowercase
    #[arg(long)]
    case_insensitive: bool,
    /// Empty layers to create before the layer files (default 0, or the options file value)
    #[arg(long)]
    layers: Option<usize>,
    /// JSON5 layer file; repeat to stack more, highest priority first
    #[arg(short = 'l', long = "layer", value_name = "FILE")]
    layer_files: Vec<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the merged value for a key; exits with status 1 when absent
    Get { key: String },
    /// Print whether any layer holds a key
    Has { key: String },
    /// Set a key in one layer, then print the merged view
    Set {
        key: String,
        /// JSON5 value; unparsable input is stored as a plain string
        value: String,
        #[arg(long, default_value_t = 0)]
        layer: usize,
    },
    /// Print the merged view as JSON
    View,
    /// Print the fingerprint of the merged view
    Hash,
    /// Print the number of distinct keys
    Count,
    /// Print the number of layers
    Len,
    /// Print every layer as a tab-separated table
    Table,
}

fn main() -> anyhow::Result<ExitCode> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting strata (options_set={}, layer_files={})",
        cli.options.is_some(),
        cli.layer_files.len()
    );
    let mut stack = build_stack(&cli)?;
    let mut stdout = io::stdout().lock();
    if run(&mut stack, cli.command, &mut stdout)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn resolve_options(cli: &Cli) -> anyhow::Result<StackOptions> {
    let mut options = match cli.options.as_ref() {
        Some(path) => StackOptions::load_from_path(path)
            .with_context(|| format!("failed to load options from {}", path.display()))?,
        None => StackOptions::new().with_layers(0),
    };
    if cli.case_insensitive {
        options.case_sensitive = false;
    }
    if let Some(layers) = cli.layers {
        options.layers = layers;
    }
    debug!("resolved stack options: {options:?}");
    Ok(options)
}

fn build_stack(cli: &Cli) -> anyhow::Result<LayeredStack> {
    let mut stack = LayeredStack::new(resolve_options(cli)?);
    for path in &cli.layer_files {
        stack
            .add_layer_from_path(path)
            .with_context(|| format!("failed to load layer {}", path.display()))?;
    }
    info!("stack built (layers={})", stack.len());
    Ok(stack)
}

/// Execute one command, returning `false` when a looked-up key is absent.
fn run<W: Write>(stack: &mut LayeredStack, command: Command, out: &mut W) -> anyhow::Result<bool> {
    match command {
        Command::Get { key } => match stack.get(&key) {
            Some(value) => writeln!(out, "{value}")?,
            None => {
                debug!("key not found: {key}");
                return Ok(false);
            }
        },
        Command::Has { key } => writeln!(out, "{}", stack.has(&key))?,
        Command::Set { key, value, layer } => {
            let value = parse_value(value);
            stack
                .set_in(layer, &key, value)
                .with_context(|| format!("failed to set {key}"))?;
            writeln!(out, "{}", serde_json::to_string_pretty(stack.view())?)?;
        }
        Command::View => writeln!(out, "{}", serde_json::to_string_pretty(stack.view())?)?,
        Command::Hash => writeln!(out, "{}", stack.hash())?,
        Command::Count => writeln!(out, "{}", stack.count())?,
        Command::Len => writeln!(out, "{}", stack.len())?,
        Command::Table => {
            stack.dump(out)?;
        }
    }
    Ok(true)
}

/// Interpret a command-line value as JSON5, falling back to a raw string.
fn parse_value(raw: String) -> Value {
    json5::from_str(&raw).unwrap_or(Value::String(raw))
}
