//! Response classification
//!
//! Maps HTTP statuses onto [`MkdxError`] variants and normalises aggregate
//! results into time order.

use crate::error::{MkdxError, Result};
use chrono::{DateTime, FixedOffset};
use reqwest::StatusCode;
use serde_json::Value;

/// Longest error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Turn a response into JSON, or into the error its status stands for
///
/// `resource` names what was requested and ends up in `NotFound`.
pub async fn into_json(response: reqwest::Response, resource: &str) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(%status, resource, "MKDX request rejected");
        return Err(classify_status(status, &body, resource));
    }

    parse_body(&body)
}

/// Parse a success body; an empty body is `null`
pub fn parse_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| MkdxError::InvalidResponse(e.to_string()))
}

/// Error for a non-success status
#[must_use]
pub fn classify_status(status: StatusCode, body: &str, resource: &str) -> MkdxError {
    let message = error_message(status, body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MkdxError::AuthFailed(message),
        StatusCode::NOT_FOUND => MkdxError::NotFound {
            resource: resource.to_string(),
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => MkdxError::Timeout(message),
        _ => MkdxError::ApiError {
            status: status.as_u16(),
            message,
        },
    }
}

/// Prefer a `message`/`error` field from a JSON body, else the raw body
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["message", "error", "detail"]
            .iter()
            .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
    });

    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }

    if message.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| message.is_char_boundary(*i))
            .unwrap_or(0);
        return format!("{}...", &message[..cut]);
    }
    message
}

/// Put aggregate readings oldest-first
///
/// Handles a top-level array or an array under `data` / `datapoints`.
/// Readings are reversed only when their `eventTime` values run backwards;
/// anything without parseable timestamps is left as the service sent it.
#[must_use]
pub fn into_time_order(mut value: Value) -> Value {
    if let Some(points) = readings_mut(&mut value) {
        if runs_newest_first(points) {
            points.reverse();
        }
    }
    value
}

fn readings_mut(value: &mut Value) -> Option<&mut Vec<Value>> {
    if value.is_array() {
        return value.as_array_mut();
    }
    let obj = value.as_object_mut()?;
    let key = ["datapoints", "data"]
        .into_iter()
        .find(|key| obj.get(*key).is_some_and(Value::is_array))?;
    obj.get_mut(key).and_then(Value::as_array_mut)
}

fn runs_newest_first(points: &[Value]) -> bool {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return false;
    };
    match (event_time(first), event_time(last)) {
        (Some(first), Some(last)) => first > last,
        _ => false,
    }
}

fn event_time(point: &Value) -> Option<DateTime<FixedOffset>> {
    ["eventTime", "event_time", "timestamp"]
        .iter()
        .find_map(|key| point.get(key).and_then(Value::as_str))
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_statuses() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = classify_status(status, r#"{"message":"Forbidden"}"#, "feed f");
            assert!(matches!(err, MkdxError::AuthFailed(ref message) if message == "Forbidden"));
        }
    }

    #[test]
    fn test_not_found_names_resource() {
        let err = classify_status(StatusCode::NOT_FOUND, "", "stream 100 in feed f");
        assert!(
            matches!(err, MkdxError::NotFound { ref resource } if resource == "stream 100 in feed f")
        );
    }

    #[test]
    fn test_other_status_keeps_code() {
        let err = classify_status(StatusCode::BAD_GATEWAY, "upstream down", "x");
        assert!(matches!(
            err,
            MkdxError::ApiError { status: 502, ref message } if message == "upstream down"
        ));
    }

    #[test]
    fn test_empty_error_body_uses_reason() {
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "  ", "x");
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body("").unwrap(), Value::Null);
        assert_eq!(parse_body(r#"{"ok":true}"#).unwrap(), json!({"ok": true}));
        assert!(matches!(
            parse_body("<html>"),
            Err(MkdxError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_time_order_reverses_newest_first() {
        let value = json!([
            {"value": 3, "eventTime": "2024-01-01T00:02:00.000Z"},
            {"value": 2, "eventTime": "2024-01-01T00:01:00.000Z"},
            {"value": 1, "eventTime": "2024-01-01T00:00:00.000Z"},
        ]);
        let ordered = into_time_order(value);
        let values: Vec<i64> = ordered
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["value"].as_i64().unwrap())
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_time_order_keeps_oldest_first_and_nested() {
        let value = json!({"datapoints": [
            {"value": 1, "eventTime": "2024-01-01T00:00:00.000Z"},
            {"value": 2, "eventTime": "2024-01-01T00:01:00.000Z"},
        ]});
        assert_eq!(into_time_order(value.clone()), value);
    }

    #[test]
    fn test_time_order_leaves_untimed_data_alone() {
        let value = json!([{"value": 2}, {"value": 1}]);
        assert_eq!(into_time_order(value.clone()), value);
    }
}
