//! MKDX CLI - post and fetch sensor readings from the command line

#![allow(clippy::print_stdout, clippy::print_stderr)] // Terminal output is this binary's job

use anyhow::Context;
use colored::Colorize;
use console::style;
use dialoguer::{Input, Password};
use mkdx::cli::{parse_scalar, Cli, Commands};
use mkdx::config::AuthConfig;
use mkdx::{display, logging, Client, Config, GetOptions, MkdxError};

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    std::process::exit(exit_code);
}

/// Main application entry point
async fn run() -> i32 {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());
            err.downcast_ref::<MkdxError>()
                .map_or(1, MkdxError::exit_code)
        }
    }
}

/// Execute the requested command
async fn execute(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!("MKDX CLI v{}", env!("CARGO_PKG_VERSION"));

    // Commands that must work with a broken or missing config file
    match &cli.command {
        Commands::Version => {
            handle_version();
            return Ok(());
        }
        Commands::Configure => return handle_configure(&cli),
        Commands::Logout => return handle_logout(),
        Commands::Post { .. } | Commands::Get { .. } => {}
    }

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Post { stream, data, raw } => handle_post(&config, &stream, &data, raw).await,
        Commands::Get {
            stream,
            aggregate,
            limit,
            quiet,
        } => handle_get(config, &stream, aggregate, limit, quiet).await,
        Commands::Configure | Commands::Logout | Commands::Version => Ok(()),
    }
}

/// Config file, then `MKDX_*` environment, then command-line flags
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default().context("loading config")?;
    config.apply_env();

    if let Some(api_key) = &cli.api_key {
        config.auth.api_key.clone_from(api_key);
    }
    if let Some(feed) = &cli.feed {
        config.auth.feed_id.clone_from(feed);
    }
    if let Some(version) = cli.api_version {
        config.version = version;
    }
    if cli.verbose {
        config.verbose = true;
    }
    Ok(config)
}

/// Handle post command
async fn handle_post(config: &Config, stream: &str, data: &str, raw: bool) -> anyhow::Result<()> {
    let client = Client::from_config(config)?;
    let ack = client.post(stream, parse_scalar(data, raw)).await?;

    println!("{} Posted to stream {stream}", "✓".green());
    if config.verbose {
        display::print(&ack).context("writing acknowledgement")?;
    }
    Ok(())
}

/// Handle get command
async fn handle_get(
    mut config: Config,
    stream: &str,
    aggregate: bool,
    limit: Option<u32>,
    quiet: bool,
) -> anyhow::Result<()> {
    if let Some(limit) = limit {
        config.aggregate_limit = limit;
    }
    let client = Client::from_config(&config)?;
    let options = GetOptions::new().display(!quiet).aggregate(aggregate);
    let _ = client.get(stream, options).await?;
    Ok(())
}

/// Handle configure command
///
/// Flags (or `MKDX_API_KEY` / `MKDX_FEED_ID`) win, then whatever the file
/// already holds, then an interactive prompt.
fn handle_configure(cli: &Cli) -> anyhow::Result<()> {
    let path = Config::config_path()?;
    let saved = Config::load_for_update(&path).auth;

    let pick = |flag: &Option<String>, existing: &str| {
        flag.as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(existing)
            .trim()
            .to_string()
    };
    let mut auth = AuthConfig::new(
        pick(&cli.api_key, &saved.api_key),
        pick(&cli.feed, &saved.feed_id),
    );

    if auth.api_key.is_empty() {
        auth.api_key = Password::new()
            .with_prompt("MKDX API key")
            .interact()
            .context("reading API key")?;
    }
    if auth.feed_id.is_empty() {
        auth.feed_id = Input::<String>::new()
            .with_prompt("Feed id")
            .interact_text()
            .context("reading feed id")?;
    }

    let config = Config::store_credentials(&path, auth)?;

    println!("{} Credentials saved to: {}", "✓".green(), path.display());
    println!(
        "  {}",
        style(format!(
            "feed {} with key {}",
            config.auth.feed_id,
            config.auth.masked_key()
        ))
        .dim()
    );
    Ok(())
}

/// Handle logout command
fn handle_logout() -> anyhow::Result<()> {
    let path = Config::config_path()?;
    if Config::clear_credentials(&path)? {
        println!("{} Logged out", "✓".green());
    } else {
        println!("No saved credentials");
    }
    Ok(())
}

/// Handle version command
fn handle_version() {
    println!("MKDX CLI v{}", mkdx::VERSION);
}
