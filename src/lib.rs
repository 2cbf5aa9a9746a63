#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # MKDX client
//!
//! A small client for the MKDX sensor-data API.
//!
//! ## Architecture
//!
//! - **[`error`]** - Error taxonomy (auth, not-found, transport, config)
//! - **[`config`]** - Configuration file, credentials, and defaults
//! - **[`client`]** - The [`Client`] with its `post` and `get` calls
//! - **[`display`]** - Pretty-printing of results
//! - **[`cli`]** - Argument parsing for the `mkdx` binary
//! - **[`logging`]** - Tracing subscriber setup

pub mod cli;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;

/// Client type re-exports for convenience
pub use client::{Client, ClientBuilder, GetOptions};

/// Error type alias for convenience
pub use error::{MkdxError, Result};

/// Configuration type alias for convenience
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "mkdx";
