//! Wire payloads and URL construction for MKDX requests

use crate::error::{MkdxError, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// One reading as the ingestion endpoint expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Target stream
    pub stream_id: String,
    /// Caller-defined scalar
    pub value: Value,
    /// UTC timestamp, millisecond precision
    pub event_time: String,
}

impl Reading {
    /// Stamp a value with the given event time
    pub fn new(stream_id: impl Into<String>, value: Value, at: DateTime<Utc>) -> Self {
        Self {
            stream_id: stream_id.into(),
            value,
            event_time: format_event_time(at),
        }
    }
}

/// Body of an ingestion request: `{"data": [reading, ...]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestPayload {
    /// Readings in this request
    pub data: Vec<Reading>,
}

impl IngestPayload {
    /// Payload carrying a single reading
    #[must_use]
    pub fn single(reading: Reading) -> Self {
        Self {
            data: vec![reading],
        }
    }
}

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`
#[must_use]
pub fn format_event_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current UTC time shifted by `offset_minutes`
///
/// # Errors
///
/// `InvalidArgument` when the shifted time is not representable.
pub fn event_time_now(offset_minutes: i64) -> Result<DateTime<Utc>> {
    shift(Utc::now(), offset_minutes)
}

fn shift(at: DateTime<Utc>, offset_minutes: i64) -> Result<DateTime<Utc>> {
    Duration::try_minutes(offset_minutes)
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or_else(|| {
            MkdxError::InvalidArgument(format!(
                "event-time offset of {offset_minutes} minutes is out of range"
            ))
        })
}

/// Ingestion URL for a feed: `{base}/{feed}/{version}`
#[must_use]
pub fn ingest_url(base: &str, feed_id: &str, version: u32) -> String {
    format!(
        "{}/{}/{version}",
        base.trim_end_matches('/'),
        urlencoding::encode(feed_id)
    )
}

/// Read URL for a stream; aggregate adds `/datapoints?limit=N`
#[must_use]
pub fn datastream_url(
    base: &str,
    feed_id: &str,
    version: u32,
    stream_id: &str,
    aggregate_limit: Option<u32>,
) -> String {
    let url = format!(
        "{}/{}/{version}/datastream/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(feed_id),
        urlencoding::encode(stream_id)
    );

    match aggregate_limit {
        Some(limit) => format!("{url}/datapoints?limit={limit}"),
        None => url,
    }
}
