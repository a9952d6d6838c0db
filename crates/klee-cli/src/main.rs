//! Klee CLI — entry point.
//!
//! # Commands
//!
//! - `klee models` — list registered models and provider status
//! - `klee chat [-m MESSAGE] [--model NAME]` — single-shot or interactive chat
//! - `klee check [--model NAME]` — smoke-test the default and a named model
//! - `klee init` — write the default config

mod check;
mod chat;
mod helpers;
mod init;
mod models_cmd;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use klee_core::config::schema::DEFAULT_MODEL_NAME;
use klee_core::config::{load_config, Config};
use klee_llm::{LlmService, ModelRegistry};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🤖 Klee — call any configured LLM by name
#[derive(Parser)]
#[command(name = "klee", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.klee/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered models and provider status
    Models,

    /// Chat with a model (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Registered model name. Omit to use the default model.
        #[arg(long)]
        model: Option<String>,

        /// System prompt prepended to the conversation
        #[arg(long)]
        system: Option<String>,

        /// Abandon a call after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Call the default model and a named model, reporting each outcome
    Check {
        /// Named model to exercise in addition to the default
        #[arg(long, default_value = DEFAULT_MODEL_NAME)]
        model: String,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write the default configuration
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Models => models_cmd::run(config_path),
        Commands::Chat {
            message,
            model,
            system,
            timeout,
            logs,
        } => {
            let config = load_config(config_path);
            init_logging(logs, config.logging.json);
            let service = build_service(&config)?;
            let opts = chat::ChatOptions {
                model,
                system,
                timeout: timeout.map(std::time::Duration::from_secs),
            };
            match message {
                Some(msg) => chat::run_once(&service, &msg, &opts).await,
                None => repl::run(service, opts).await,
            }
        }
        Commands::Check { model, logs } => {
            let config = load_config(config_path);
            init_logging(logs, config.logging.json);
            let service = build_service(&config)?;
            check::run(&service, &model).await
        }
        Commands::Init => init::run(config_path),
    }
}

/// Build the registry and dispatch service from the loaded configuration.
///
/// Any registry misconfiguration stops the process here, before a call is made.
pub fn build_service(config: &Config) -> Result<LlmService> {
    let registry = ModelRegistry::from_config(config).context("invalid model configuration")?;
    Ok(LlmService::new(Arc::new(registry)))
}

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins when set; otherwise `--logs` selects debug output for Klee.
fn init_logging(verbose: bool, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("klee=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
