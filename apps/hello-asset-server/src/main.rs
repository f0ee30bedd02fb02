mod config;
mod logging;
mod server;
mod signals;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hello_asset::{ProbeContext, ProbeService};

use std::path::PathBuf;

use config::{AppConfig, CliOverrides};

/// hello-asset server - asset service connectivity probe
#[derive(Parser)]
#[command(name = "hello-asset-server")]
#[command(about = "hello-asset server - asset service connectivity probe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and service bindings, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.to_string_lossy());
    }

    // 1) defaults -> 2) YAML -> 3) env (APP__*) -> 4) platform env -> 5) CLI
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        port: cli.port,
        verbose: cli.verbose,
    });

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init_logging(&config.logging)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn resolve_bindings(config: &AppConfig) -> Result<ProbeContext> {
    hello_asset::resolve(&config.probe, &config.platform)
        .context("failed to resolve service bindings")
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    let context = resolve_bindings(config)?;
    tracing::info!(
        asset_bound = context.asset.is_bound(),
        trusted_issuer = %context.descriptor.trusted_issuer,
        "service bindings resolved"
    );
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "hello-asset server starting");

    let context = resolve_bindings(&config)?;
    if context.asset.is_bound() {
        tracing::info!(
            service = %context.descriptor.service_name,
            plan = %context.descriptor.plan_name,
            "asset service bound"
        );
    } else {
        tracing::warn!(
            service_name = %config.probe.service_name,
            "asset service not bound, /ping will ask for a binding"
        );
    }

    let service = ProbeService::new(context, config.probe.http.clone());
    server::serve(&config.server, service).await
}
