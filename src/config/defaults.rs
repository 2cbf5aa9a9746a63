//! Default configuration values

/// Default data-service URL (reads)
pub fn default_api_url() -> String {
    "https://api.mkdx.btcsp.co.uk/data-service/sensors/feeds".to_string()
}

/// Default ingestion URL (writes)
pub fn default_ingest_url() -> String {
    "https://ing.mkdx.btcsp.co.uk/datahub-adapter/sensors/feeds".to_string()
}

/// Default feed protocol version
pub const fn default_version() -> u32 {
    DEFAULT_VERSION
}

/// Default number of readings fetched in aggregate mode
pub const fn default_aggregate_limit() -> u32 {
    DEFAULT_AGGREGATE_LIMIT
}

/// Default request timeout in seconds
pub const fn default_timeout() -> u64 {
    30
}

/// Feed protocol version used when none is given
pub const DEFAULT_VERSION: u32 = 1;

/// Readings returned by an aggregate fetch unless configured otherwise
pub const DEFAULT_AGGREGATE_LIMIT: u32 = 100;

/// Largest event-time offset accepted, either direction (one leap year)
pub const MAX_TIME_OFFSET_MINUTES: i64 = 366 * 24 * 60;

/// Connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "MKDX_API_KEY";

/// Environment variable holding the feed id
pub const ENV_FEED_ID: &str = "MKDX_FEED_ID";

/// Environment variable overriding the data-service URL
pub const ENV_API_URL: &str = "MKDX_API_URL";

/// Environment variable overriding the ingestion URL
pub const ENV_INGEST_URL: &str = "MKDX_INGEST_URL";
