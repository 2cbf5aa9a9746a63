//! Command-line interface argument parsing
//!
//! Defines all CLI commands and their arguments using Clap.

use clap::{Parser, Subcommand};
use serde_json::Value;

/// MKDX CLI - post and fetch sensor readings
#[derive(Parser, Debug)]
#[command(name = "mkdx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Post and fetch sensor readings on an MKDX data feed")]
#[command(long_about = concat!(
    "MKDX (v", env!("CARGO_PKG_VERSION"), ")\n",
    "Post scalar readings to MKDX data streams and read them back.\n\n",
    "Credentials come from --api-key/--feed, MKDX_API_KEY/MKDX_FEED_ID,\n",
    "or the config file written by 'mkdx configure'."
))]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API key (overrides the config file)
    #[arg(long, global = true, env = "MKDX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Feed id (overrides the config file)
    #[arg(long, global = true, env = "MKDX_FEED_ID")]
    pub feed: Option<String>,

    /// Feed protocol version
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub api_version: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post one reading to a stream
    ///
    /// Numbers and booleans are sent as JSON scalars, anything else as a string.
    ///
    /// Examples:
    ///   mkdx post 100 "AQI: 2"
    ///   mkdx post 101 21.5
    ///   mkdx post 102 42 --raw     # send "42" as a string
    #[command(display_order = 1)]
    Post {
        /// Stream id
        stream: String,

        /// Value to post
        data: String,

        /// Always send the value as a string
        #[arg(long)]
        raw: bool,
    },

    /// Fetch the latest value of a stream
    ///
    /// Examples:
    ///   mkdx get 100
    ///   mkdx get 100 --aggregate
    ///   mkdx get 100 --aggregate --limit 20
    #[command(display_order = 2)]
    Get {
        /// Stream id
        stream: String,

        /// Fetch the last N readings instead of the latest
        #[arg(short, long)]
        aggregate: bool,

        /// Readings fetched with --aggregate
        #[arg(long, requires = "aggregate", value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,

        /// Don't print the result
        #[arg(short, long)]
        quiet: bool,
    },

    /// Save credentials to ~/.config/mkdx/config.toml
    ///
    /// Uses --api-key and --feed when given and prompts for anything missing.
    ///
    /// Example:
    ///   mkdx configure --feed my-feed
    #[command(visible_alias = "login")]
    #[command(display_order = 3)]
    Configure,

    /// Clear saved credentials
    #[command(display_order = 4)]
    Logout,

    /// Print the CLI version
    #[command(display_order = 5)]
    Version,
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// # Returns
    ///
    /// Parsed CLI arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }
}

/// Interpret a command-line value as a JSON scalar
///
/// Numbers and `true`/`false` become JSON scalars unless `raw` is set;
/// everything else is a string.
#[must_use]
pub fn parse_scalar(input: &str, raw: bool) -> Value {
    if raw {
        return Value::String(input.to_string());
    }
    match serde_json::from_str::<Value>(input.trim()) {
        Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from(["mkdx", "get", "100", "--aggregate", "--limit", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Get {
                ref stream,
                aggregate: true,
                limit: Some(5),
                quiet: false,
            } if stream == "100"
        ));
    }

    #[test]
    fn test_limit_requires_aggregate() {
        assert!(Cli::try_parse_from(["mkdx", "get", "100", "--limit", "5"]).is_err());
    }

    #[test]
    fn test_parse_scalar() {
        assert_eq!(parse_scalar("AQI: 2", false), json!("AQI: 2"));
        assert_eq!(parse_scalar("21.5", false), json!(21.5));
        assert_eq!(parse_scalar("true", false), json!(true));
        assert_eq!(parse_scalar("42", true), json!("42"));
        assert_eq!(parse_scalar("[1,2]", false), json!("[1,2]"));
    }
}
