//! # cnd: CND Monitor CLI Entry Point
//!
//! Parses arguments, configures logging, connects to the certificate
//! service and loads the record list, then dispatches to the subcommand.
//! Notifications raised by the panel are printed to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cnd_cli::edit::{run_create, run_edit, CreateArgs, EditArgs};
use cnd_cli::history::{run_history, HistoryArgs};
use cnd_cli::records::{run_delete, run_download, run_list, DeleteArgs, DownloadArgs, ListArgs};
use cnd_cli::render::write_notifications;
use cnd_cli::settings::{self, ConnectionArgs};
use cnd_client::CndClient;
use cnd_panel::{LoadState, PanelConfig, RecordListView};

/// CND Monitor: tax clearance certificate records.
#[derive(Parser, Debug)]
#[command(name = "cnd", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML file with `api_url` and `timeout_secs`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List records, optionally filtered.
    List(ListArgs),
    /// Create a record.
    Create(CreateArgs),
    /// Edit an existing record.
    Edit(EditArgs),
    /// Delete one or more records.
    Delete(DeleteArgs),
    /// Download the certificate document of a record.
    Download(DownloadArgs),
    /// Show the audit history of a record's taxpayer and jurisdiction.
    History(HistoryArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("cnd CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let mut view = match connect(&cli).await {
        Ok(view) => view,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::List(args) => run_list(&mut view, args, &mut stdout),
        Commands::Create(args) => run_create(&mut view, args, &mut stdout).await,
        Commands::Edit(args) => run_edit(&mut view, args, &mut stdout).await,
        Commands::Delete(args) => run_delete(&mut view, args, &mut stdout).await,
        Commands::Download(args) => run_download(&mut view, args, &mut stdout).await,
        Commands::History(args) => run_history(&mut view, args, &mut stdout).await,
    };

    if let Err(e) = write_notifications(&mut std::io::stderr(), &view.drain_notifications()) {
        tracing::warn!("could not print notifications: {e:#}");
    }

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Build the client and view, and load the record list.
async fn connect(cli: &Cli) -> Result<RecordListView> {
    let config = settings::resolve(cli.config.as_deref(), &cli.connection)?;
    tracing::info!(base_url = %config.base_url, "connecting to certificate service");
    let client = CndClient::new(config).context("failed to build certificate service client")?;

    let mut view = RecordListView::new(Arc::new(client), PanelConfig::from_env());
    if view.load_records().await.is_err() {
        write_notifications(&mut std::io::stderr(), &view.drain_notifications())?;
        if let LoadState::Failed(message) = view.load_state() {
            bail!("could not load records: {message}");
        }
        bail!("could not load records");
    }
    view.drain_notifications();
    Ok(view)
}
