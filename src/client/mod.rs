//! MKDX API client
//!
//! [`Client`] holds one feed's credentials and exposes the two calls the
//! service supports: [`Client::post`] writes a reading to a stream and
//! [`Client::get`] reads the latest value (or the last N values) back.
//! Each call is exactly one HTTP request; nothing is retried or cached.

pub mod request;
pub mod response;
pub mod transport;

use crate::config::{self, Config};
use crate::display;
use crate::error::{MkdxError, Result};
use request::{IngestPayload, Reading};
use serde_json::Value;
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// Flags for [`Client::get`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Also pretty-print the result to stdout
    pub display: bool,
    /// Fetch the last N readings instead of the latest one
    pub aggregate: bool,
}

impl GetOptions {
    /// Latest value, no output
    #[must_use]
    pub const fn new() -> Self {
        Self {
            display: false,
            aggregate: false,
        }
    }

    /// Set the display flag
    #[must_use]
    pub const fn display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    /// Set the aggregate flag
    #[must_use]
    pub const fn aggregate(mut self, aggregate: bool) -> Self {
        self.aggregate = aggregate;
        self
    }
}

/// Builder for [`Client`]
#[derive(Clone)]
pub struct ClientBuilder {
    api_key: String,
    feed_id: String,
    version: u32,
    api_url: String,
    ingest_url: String,
    aggregate_limit: u32,
    time_offset_minutes: i64,
    timeout: Duration,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("feed_id", &self.feed_id)
            .field("version", &self.version)
            .field("api_url", &self.api_url)
            .field("ingest_url", &self.ingest_url)
            .field("aggregate_limit", &self.aggregate_limit)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Protocol version (default 1)
    #[must_use]
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Data-service base URL used by `get`
    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Ingestion base URL used by `post`
    #[must_use]
    pub fn ingest_url(mut self, url: impl Into<String>) -> Self {
        self.ingest_url = url.into();
        self
    }

    /// Readings requested by an aggregate `get` (default 100)
    #[must_use]
    pub fn aggregate_limit(mut self, limit: u32) -> Self {
        self.aggregate_limit = limit;
        self
    }

    /// Minutes added to the UTC clock when stamping posted readings
    #[must_use]
    pub fn time_offset_minutes(mut self, minutes: i64) -> Self {
        self.time_offset_minutes = minutes;
        self
    }

    /// Whole-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the parameters and build the client
    ///
    /// # Errors
    ///
    /// `MissingCredentials` for a blank API key or feed id,
    /// `InvalidConfig` for a zero version, limit, or timeout, a blank URL, or
    /// a time offset beyond a year.
    pub fn build(self) -> Result<Client> {
        if self.api_key.trim().is_empty() {
            return Err(MkdxError::MissingCredentials("API key is empty".to_string()));
        }
        if self.feed_id.trim().is_empty() {
            return Err(MkdxError::MissingCredentials("feed id is empty".to_string()));
        }
        if self.version == 0 {
            return Err(MkdxError::InvalidConfig("version must be at least 1".to_string()));
        }
        if self.aggregate_limit == 0 {
            return Err(MkdxError::InvalidConfig(
                "aggregate_limit must be greater than 0".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(MkdxError::InvalidConfig(
                "timeout must be greater than 0".to_string(),
            ));
        }
        if self.api_url.trim().is_empty() || self.ingest_url.trim().is_empty() {
            return Err(MkdxError::InvalidConfig("service URLs cannot be empty".to_string()));
        }
        config::check_time_offset(self.time_offset_minutes)?;

        let http = transport::build_http_client(&self.api_key, self.timeout)?;

        Ok(Client {
            http,
            feed_id: self.feed_id,
            version: self.version,
            api_url: self.api_url,
            ingest_url: self.ingest_url,
            aggregate_limit: self.aggregate_limit,
            time_offset_minutes: self.time_offset_minutes,
        })
    }
}

/// Client for one MKDX feed
///
/// Immutable once built. The API key lives only inside the HTTP client's
/// default headers.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    feed_id: String,
    version: u32,
    api_url: String,
    ingest_url: String,
    aggregate_limit: u32,
    time_offset_minutes: i64,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("feed_id", &self.feed_id)
            .field("version", &self.version)
            .field("api_url", &self.api_url)
            .field("ingest_url", &self.ingest_url)
            .field("aggregate_limit", &self.aggregate_limit)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Start building a client for `feed_id` authenticated with `api_key`
    pub fn builder(api_key: impl Into<String>, feed_id: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            api_key: api_key.into(),
            feed_id: feed_id.into(),
            version: config::DEFAULT_VERSION,
            api_url: config::default_api_url(),
            ingest_url: config::default_ingest_url(),
            aggregate_limit: config::DEFAULT_AGGREGATE_LIMIT,
            time_offset_minutes: 0,
            timeout: Duration::from_secs(config::default_timeout()),
        }
    }

    /// Client with default endpoints and protocol version 1
    ///
    /// # Errors
    ///
    /// `MissingCredentials` if either argument is blank.
    pub fn new(api_key: impl Into<String>, feed_id: impl Into<String>) -> Result<Self> {
        Self::builder(api_key, feed_id).build()
    }

    /// Client built from a loaded configuration
    ///
    /// # Errors
    ///
    /// Anything [`Config::validate`] or [`ClientBuilder::build`] rejects.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::builder(config.auth.api_key.clone(), config.auth.feed_id.clone())
            .version(config.version)
            .api_url(config.api_url.clone())
            .ingest_url(config.ingest_url.clone())
            .aggregate_limit(config.aggregate_limit)
            .time_offset_minutes(config.time_offset_minutes)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
    }

    /// Feed this client writes to and reads from
    #[must_use]
    pub fn feed_id(&self) -> &str {
        &self.feed_id
    }

    /// Protocol version
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Readings requested by an aggregate `get`
    #[must_use]
    pub const fn aggregate_limit(&self) -> u32 {
        self.aggregate_limit
    }

    /// Post one reading to `stream_id`
    ///
    /// The reading is stamped with the current UTC time (plus the configured
    /// offset) and sent as a single-element batch. Returns the service's
    /// acknowledgement body.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank stream id (no request is sent),
    /// `AuthFailed` on 401/403, `NotFound` on 404, transport errors otherwise.
    pub async fn post(&self, stream_id: &str, data: impl Into<Value>) -> Result<Value> {
        let stream_id = require_stream_id(stream_id)?;
        let at = request::event_time_now(self.time_offset_minutes)?;
        let payload = IngestPayload::single(Reading::new(stream_id, data.into(), at));
        let url = request::ingest_url(&self.ingest_url, &self.feed_id, self.version);

        tracing::debug!(%url, stream_id, event_time = %payload.data[0].event_time, "POST reading");

        let reply = self.http.post(&url).json(&payload).send().await?;
        response::into_json(reply, &self.resource(stream_id)).await
    }

    /// Fetch the latest value of `stream_id`, or the last N with `aggregate`
    ///
    /// Aggregate results come back oldest-first. With `display` the result is
    /// also pretty-printed to stdout.
    ///
    /// # Errors
    ///
    /// Same as [`Client::post`].
    pub async fn get(&self, stream_id: &str, options: GetOptions) -> Result<Value> {
        self.get_with_output(stream_id, options, &mut io::stdout()).await
    }

    /// [`Client::get`] with `display` output sent to `out` instead of stdout
    ///
    /// # Errors
    ///
    /// Same as [`Client::post`], plus `Io` if writing to `out` fails.
    pub async fn get_with_output<W>(
        &self,
        stream_id: &str,
        options: GetOptions,
        out: &mut W,
    ) -> Result<Value>
    where
        W: Write + Send,
    {
        let stream_id = require_stream_id(stream_id)?;
        let limit = options.aggregate.then_some(self.aggregate_limit);
        let url = request::datastream_url(
            &self.api_url,
            &self.feed_id,
            self.version,
            stream_id,
            limit,
        );

        tracing::debug!(%url, stream_id, aggregate = options.aggregate, "GET datastream");

        let reply = self.http.get(&url).send().await?;
        let mut value = response::into_json(reply, &self.resource(stream_id)).await?;

        if options.aggregate {
            value = response::into_time_order(value);
        }
        if options.display {
            display::write_to(out, &value)?;
        }
        Ok(value)
    }

    /// Fetch the latest value of `stream_id`
    ///
    /// # Errors
    ///
    /// Same as [`Client::get`].
    pub async fn latest(&self, stream_id: &str) -> Result<Value> {
        self.get(stream_id, GetOptions::new()).await
    }

    /// Fetch the last N readings of `stream_id`, oldest first
    ///
    /// # Errors
    ///
    /// Same as [`Client::get`].
    pub async fn history(&self, stream_id: &str) -> Result<Value> {
        self.get(stream_id, GetOptions::new().aggregate(true)).await
    }

    fn resource(&self, stream_id: &str) -> String {
        format!(
            "stream '{stream_id}' in feed '{}' (v{})",
            self.feed_id, self.version
        )
    }
}

fn require_stream_id(stream_id: &str) -> Result<&str> {
    let trimmed = stream_id.trim();
    if trimmed.is_empty() {
        return Err(MkdxError::InvalidArgument(
            "stream id cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
