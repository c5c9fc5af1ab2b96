//! Replays an A2UI message log and prints the rendered surfaces.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use a2ui::message::{is_a2ui_message, split_stream};
use a2ui::serialize::{snapshot_to_json, snapshot_to_yaml};
use a2ui::{Config, MessageProcessor, ProcessOutcome};

#[derive(Parser, Debug)]
#[command(name = "a2ui-render", version, about)]
struct Cli {
    /// Message log (JSON array or JSON Lines); `-` reads stdin. Items may be
    /// A2UI messages or A2A message parts.
    input: String,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Only print this surface.
    #[arg(long)]
    surface: Option<String>,
    /// Print the registry state instead of rendered trees.
    #[arg(long, value_enum)]
    state: Option<StateFormat>,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StateFormat {
    Json,
    Yaml,
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
}

/// Applies each log item as an A2UI message, or as an A2A part carrying
/// one. Items that are neither are skipped.
fn apply_items(processor: &mut MessageProcessor, items: &[Value]) -> ProcessOutcome {
    let mut outcome = ProcessOutcome::default();
    for (i, item) in items.iter().enumerate() {
        let step = if is_a2ui_message(item) {
            processor.process_value(item)
        } else {
            processor.process_parts(std::slice::from_ref(item))
        };
        if step.applied == 0 {
            tracing::debug!(item = i + 1, "item is neither a message nor a data part");
        }
        outcome.applied += step.applied;
        outcome.version = processor.version();
        outcome.diagnostics.extend(step.diagnostics);
    }
    outcome
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let text = read_input(&cli.input)?;
    let items = split_stream(&text).context("invalid message log")?;

    let mut processor = MessageProcessor::with_config(config);
    let outcome = apply_items(&mut processor, &items);
    for diagnostic in &outcome.diagnostics {
        tracing::warn!(%diagnostic, "message log diagnostic");
    }
    tracing::info!(
        applied = outcome.applied,
        version = outcome.version,
        diagnostics = outcome.diagnostics.len(),
        "message log applied"
    );

    let snapshot = processor.get_surfaces();
    if let Some(id) = &cli.surface
        && !snapshot.contains(id)
    {
        bail!("no surface named {}", id);
    }

    match cli.state {
        Some(StateFormat::Json) => {
            let state = snapshot_to_json(&snapshot)?;
            let state = match &cli.surface {
                Some(id) => state.get(id).cloned().unwrap_or(Value::Null),
                None => state,
            };
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Some(StateFormat::Yaml) => match &cli.surface {
            Some(id) => {
                let surface = snapshot.get(id).map(|s| s.as_ref());
                print!("{}", a2ui::serialize::to_yaml(&surface)?);
            }
            None => print!("{}", snapshot_to_yaml(&snapshot)?),
        },
        None => {
            let mut trees = serde_json::Map::new();
            for id in snapshot.surface_ids() {
                if cli.surface.as_deref().is_some_and(|wanted| wanted != id) {
                    continue;
                }
                let tree = processor.render(id);
                trees.insert(id.to_string(), serde_json::to_value(tree)?);
            }
            println!("{}", serde_json::to_string_pretty(&trees)?);
        }
    }
    Ok(())
}
