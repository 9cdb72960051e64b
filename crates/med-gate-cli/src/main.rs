// crates/med-gate-cli/src/main.rs
// ============================================================================
// Module: Med Gate CLI Entry Point
// Description: Command dispatcher for the Med Gate gateway and host listing.
// Purpose: Provide a safe-by-default launcher for the gateway server.
// Dependencies: clap, med-gate-api, med-gate-config, med-gate-core, tokio
// ============================================================================

//! ## Overview
//! The `med-gate` binary serves the HTTP gateway and lists the approved host
//! registry. Serving is fail-closed: non-loopback binds require an explicit
//! opt-in flag or environment variable, and a warning is emitted whenever the
//! listener is exposed beyond loopback.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use med_gate_api::ApiServer;
use med_gate_cli::enforce_bind_policy;
use med_gate_cli::resolve_allow_non_loopback;
use med_gate_config::ConfigError;
use med_gate_config::MedGateConfig;
use med_gate_core::builtin_registry;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// Gateway for approved medical information sources.
#[derive(Debug, Parser)]
#[command(name = "med-gate", version, about)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP gateway.
    Serve {
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the configured bind address.
        #[arg(long)]
        bind: Option<String>,
        /// Allow binding to non-loopback addresses.
        #[arg(long)]
        allow_non_loopback: bool,
    },
    /// List the approved host registry as JSON.
    Hosts {
        /// Restrict the listing to trusted hosts.
        #[arg(long)]
        trusted: bool,
        /// Restrict the listing to hosts serving a category.
        #[arg(long)]
        category: Option<String>,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI execution errors.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The bind policy rejected the requested listener.
    #[error(transparent)]
    Policy(#[from] med_gate_cli::ServePolicyError),
    /// The async runtime could not be constructed.
    #[error("runtime start failed: {0}")]
    Runtime(String),
    /// The gateway server failed.
    #[error("{0}")]
    Server(String),
    /// Writing command output failed.
    #[error("output failed: {0}")]
    Output(String),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Binary entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(std::io::stderr(), "med-gate: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatches the parsed command.
fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Serve {
            config,
            bind,
            allow_non_loopback,
        } => run_serve(config.as_deref(), bind, allow_non_loopback),
        Command::Hosts {
            trusted,
            category,
        } => run_hosts(trusted, category.as_deref()),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Loads configuration, enforces the bind policy, and serves the gateway.
fn run_serve(
    config_path: Option<&std::path::Path>,
    bind_override: Option<String>,
    allow_flag: bool,
) -> Result<(), CliError> {
    let mut config = MedGateConfig::load(config_path)?;
    if let Some(bind) = bind_override {
        config.server.bind = bind;
    }

    let allow_non_loopback = resolve_allow_non_loopback(allow_flag)?;
    let outcome = enforce_bind_policy(&config.server.bind, allow_non_loopback)?;
    if outcome.network_exposed {
        let _ = writeln!(
            std::io::stderr(),
            "med-gate: WARNING: listener bound to non-loopback address {}; the gateway has no \
             built-in authentication",
            outcome.addr
        );
    }

    let server =
        ApiServer::from_config(config).map_err(|err| CliError::Server(err.to_string()))?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::Runtime(err.to_string()))?;
    runtime.block_on(server.serve()).map_err(|err| CliError::Server(err.to_string()))
}

// ============================================================================
// SECTION: Hosts Command
// ============================================================================

/// Prints the approved host registry, optionally filtered.
fn run_hosts(trusted_only: bool, category: Option<&str>) -> Result<(), CliError> {
    let registry = builtin_registry();
    let mut entries = serde_json::Map::new();
    for (key, host) in registry.iter() {
        if trusted_only && !host.trusted {
            continue;
        }
        if let Some(category) = category
            && !host.has_category(category)
        {
            continue;
        }
        let value = serde_json::to_value(host)
            .map_err(|err| CliError::Output(err.to_string()))?;
        entries.insert(key.to_string(), value);
    }
    let listing = serde_json::Value::Object(entries);
    let rendered = serde_json::to_string_pretty(&listing)
        .map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(std::io::stdout(), "{rendered}")
        .map_err(|err| CliError::Output(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
