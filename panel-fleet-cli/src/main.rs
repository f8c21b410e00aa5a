//! `panel-fleet` command-line entry point
//!
//! Loads the fleet configuration, wires the WHM client and static server pool
//! into a `ServiceContext`, and runs one command. Logs go to stderr, results
//! to stdout.
//!
//! Exit codes: 0 on success, 1 on error, 2 when the domain is not hosted on
//! any scanned server.

mod cli;
mod config;
mod output;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use panel_fleet_client::{ClientConfig, ControlPanelClient, WhmClient, redact};
use panel_fleet_core::services::{DomainResolver, FleetSearchService, FleetStatusService};
use panel_fleet_core::types::ResolutionRequest;
use panel_fleet_core::{CancellationToken, CoreError, ServiceContext, StaticServerPool};

use cli::{AccountsArgs, Cli, Commands};
use config::FleetConfig;
use output::OutputFormat;

const EXIT_NOT_FOUND: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    watch_interrupt(cancel.clone());

    match run(cli.command, cli.format, &config, &cancel).await {
        Ok(code) => code,
        Err(e) => {
            let message = config
                .secrets()
                .fold(format!("{e:#}"), |text, secret| redact(&text, secret));
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// stderr, no timestamps; `RUST_LOG` refines the default level.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// First Ctrl-C cancels the running scan between servers.
fn watch_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping before the next server");
            cancel.cancel();
        }
    });
}

fn load_config(path: Option<&Path>) -> Result<FleetConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config::default_path()?,
    };
    FleetConfig::load(&path)
}

fn build_context(config: &FleetConfig) -> Result<Arc<ServiceContext>> {
    let client = WhmClient::new(ClientConfig::from(&config.client))
        .context("failed to build HTTP client")?;
    let client: Arc<dyn ControlPanelClient> = Arc::new(client);
    let pool = Arc::new(StaticServerPool::new(config.servers(), Arc::clone(&client)));
    tracing::debug!("Fleet of {} servers via {} client", config.servers.len(), client.id());
    Ok(Arc::new(ServiceContext::new(
        pool,
        client,
        config.resolver.clone(),
    )))
}

async fn run(
    command: Commands,
    format: OutputFormat,
    config: &FleetConfig,
    cancel: &CancellationToken,
) -> Result<ExitCode> {
    let ctx = build_context(config)?;

    match command {
        Commands::Resolve { domain, mode } => {
            let request = ResolutionRequest::new(domain, mode);
            let response = DomainResolver::new(ctx)
                .resolve_with_cancel(&request, cancel)
                .await?;
            output::emit(format, &response, output::render_resolution)?;
            if response.canonical.is_none() {
                return Ok(ExitCode::from(EXIT_NOT_FOUND));
            }
        }
        Commands::Locate { domain, mode } => {
            let request = ResolutionRequest::new(domain, mode);
            let located = DomainResolver::new(ctx)
                .locate_with_cancel(&request, cancel)
                .await;
            match located {
                Ok(found) => output::emit(format, &found, output::render_match)?,
                Err(CoreError::NotFound(domain)) => {
                    eprintln!("{domain}: not found on any server");
                    return Ok(ExitCode::from(EXIT_NOT_FOUND));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Search { keyword } => {
            let result = FleetSearchService::new(ctx)
                .search_domains(&keyword, cancel)
                .await?;
            output::emit(format, &result, output::render_keyword_search)?;
        }
        Commands::Accounts(args) => accounts(ctx, &args, format, cancel).await?,
        Commands::Status => {
            let rows = FleetStatusService::new(ctx).fleet_status().await?;
            output::emit(format, rows.as_slice(), output::render_status)?;
        }
        Commands::Inventory { server_id } => {
            let inventory = FleetSearchService::new(ctx)
                .server_inventory(&server_id)
                .await?;
            output::emit(format, &inventory, output::render_inventory)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn accounts(
    ctx: Arc<ServiceContext>,
    args: &AccountsArgs,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let filter = args.filter();
    let search = FleetSearchService::new(ctx);

    match &args.server {
        Some(server_id) => {
            filter.validate()?;
            let compiled = filter.compile();
            let mut listed = search.list_accounts(server_id).await?;
            listed.retain(|account| compiled.matches(account));
            output::emit(format, listed.as_slice(), output::render_accounts)
        }
        None => {
            let result = search.search_accounts(&filter, cancel).await?;
            output::emit(format, &result, output::render_account_search)
        }
    }
}
