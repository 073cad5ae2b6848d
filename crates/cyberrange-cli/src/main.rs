//! Command-line runner for the agentic security range.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cyberrange_catalog::Catalog;
use cyberrange_orchestrator::{EvaluationRequest, Orchestrator};
use cyberrange_subject::ReqwestTransport;
use cyberrange_types::EvaluationConfig;
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "cyberrange")]
#[command(about = "Attack-tests a remote A2A subject and reports its defensive posture")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one evaluation against a subject and print the result.
    Run {
        /// Subject base URL. Overrides the endpoint in --config if both are given.
        #[arg(short, long)]
        endpoint: Option<String>,
        /// TOML config file with `subject_endpoint` plus evaluation settings.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory to persist the result as eval_{id}.json, in addition to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List the loaded technique catalog.
    Catalog,
    /// Validate a config file without running anything.
    Check {
        /// TOML config file to validate.
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Shape of a `run`/`check` config file: the subject endpoint alongside the
/// evaluation settings, flattened so both live in one flat TOML document.
#[derive(Debug, Deserialize)]
struct FileConfig {
    subject_endpoint: String,
    #[serde(flatten)]
    evaluation: EvaluationConfig,
}

fn load_config(path: &PathBuf) -> anyhow::Result<FileConfig> {
    let text = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&text)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { endpoint, config, out } => run(endpoint, config, out).await,
        Commands::Catalog => {
            catalog();
            Ok(())
        }
        Commands::Check { config } => check(&config),
    }
}

async fn run(endpoint: Option<String>, config: Option<PathBuf>, out: Option<PathBuf>) -> anyhow::Result<()> {
    let request = match (endpoint, config) {
        (Some(endpoint), Some(config_path)) => {
            let file = load_config(&config_path)?;
            EvaluationRequest::new(endpoint).with_config(file.evaluation)
        }
        (Some(endpoint), None) => EvaluationRequest::new(endpoint),
        (None, Some(config_path)) => {
            let file = load_config(&config_path)?;
            EvaluationRequest::new(file.subject_endpoint).with_config(file.evaluation)
        }
        (None, None) => {
            anyhow::bail!("run requires --endpoint, --config, or both");
        }
    };

    let transport = Arc::new(ReqwestTransport::new());
    let orchestrator = Orchestrator::new(transport);
    let result = orchestrator.evaluate(request).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(dir) = out {
        // A time-ordered id so eval_*.json files sort by creation order.
        let id = uuid::Uuid::now_v7().to_string();
        let path = cyberrange_orchestrator::persist_result(&result, &dir, &id)?;
        eprintln!("result written to {}", path.display());
    }

    Ok(())
}

fn catalog() {
    let catalog = Catalog::builtin();
    println!("{:<28} {:<12} {:<10} {}", "id", "platforms", "domains", "ml-adjacent");
    let mut entries: Vec<_> = catalog.all().collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    for technique in entries {
        let platforms: Vec<_> = technique.platforms.iter().cloned().collect();
        let domains: Vec<_> = technique.domains.iter().cloned().collect();
        println!(
            "{:<28} {:<12} {:<10} {}",
            technique.id,
            platforms.join(","),
            domains.join(","),
            technique.ml_adjacent
        );
    }
    println!("{} techniques loaded", catalog.len());
}

fn check(config_path: &PathBuf) -> anyhow::Result<()> {
    let file = load_config(config_path)?;
    match file.evaluation.validate() {
        Ok(()) => {
            println!("{} is valid (subject: {})", config_path.display(), file.subject_endpoint);
            Ok(())
        }
        Err(reason) => anyhow::bail!("{} is invalid: {reason}", config_path.display()),
    }
}
