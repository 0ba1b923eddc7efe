//! TemplateSync CLI
//!
//! Command-line interface for managing Transloadit templates.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use url::Url;

use templatesync::client::HttpTemplateClient;
use templatesync::commands::templates::{
    self, CreateArgs, DeleteArgs, GetArgs, ModifyArgs, SyncArgs,
};
use templatesync::output::BufferedOutput;

#[derive(Parser)]
#[command(name = "templatesync")]
#[command(
    author,
    version,
    about = "Manage Transloadit templates from a local directory tree"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Transloadit auth key
    #[arg(long, env = "TRANSLOADIT_KEY", global = true, hide_env_values = true)]
    key: Option<String>,

    /// Transloadit auth secret
    #[arg(long, env = "TRANSLOADIT_SECRET", global = true, hide_env_values = true)]
    secret: Option<String>,

    /// Service endpoint
    #[arg(
        long,
        env = "TRANSLOADIT_ENDPOINT",
        default_value = "https://api2.transloadit.com",
        global = true
    )]
    endpoint: Url,

    /// Show detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage remote templates
    #[command(subcommand, alias = "templates")]
    Template(TemplateCommand),
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// Create a template from a local JSON file
    Create(CreateArgs),
    /// Fetch templates by id
    Get(GetArgs),
    /// Rename a template and/or replace its content
    Modify(ModifyArgs),
    /// Delete templates by id
    Delete(DeleteArgs),
    /// Reconcile local template files with the remote collection
    Sync(SyncArgs),
    /// List every template in the account
    List,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let key = cli
        .key
        .context("missing auth key: pass --key or set TRANSLOADIT_KEY")?;
    let secret = cli
        .secret
        .context("missing auth secret: pass --secret or set TRANSLOADIT_SECRET")?;
    let client = HttpTemplateClient::new(cli.endpoint, key, secret);

    let output = BufferedOutput::new();

    let result = match cli.command {
        Commands::Template(command) => match command {
            TemplateCommand::Create(args) => templates::create(&output, &client, args).await,
            TemplateCommand::Get(args) => templates::get(&output, &client, args).await,
            TemplateCommand::Modify(args) => templates::modify(&output, &client, args).await,
            TemplateCommand::Delete(args) => templates::delete(&output, &client, args).await,
            TemplateCommand::Sync(args) => templates::sync(&output, &client, args)
                .await
                .map(|_report| ()),
            TemplateCommand::List => templates::list(&output, &client).await,
        },
    };

    output.render();
    result?;

    Ok(if output.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
