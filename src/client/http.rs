//! HTTP client construction, bearer headers and status mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::error::{LiminalError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;

pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("liminaldb-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| LiminalError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// `Accept: application/json`, plus `Authorization: Bearer` when a token is given.
pub fn request_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            LiminalError::Configuration("API token contains invalid header characters".to_string())
        })?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    code: Option<String>,
}

/// Map a failed response to a typed error.
pub fn status_to_error(status: u16, body: &str, is_json: bool) -> LiminalError {
    let (message, server_code) = if is_json {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => (parsed.error, parsed.code),
            Err(_) => (None, None),
        }
    } else {
        (Some(body.trim().to_string()).filter(|b| !b.is_empty()), None)
    };
    let message = message.unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        404 => LiminalError::PromptNotFound(message),
        409 => LiminalError::DuplicateSlug(message),
        _ => LiminalError::Api {
            status,
            message,
            server_code,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_body_supplies_message_and_code() {
        let err = status_to_error(422, r#"{"error":"bad tags","code":"INVALID"}"#, true);
        match err {
            LiminalError::Api {
                status,
                message,
                server_code,
            } => {
                assert_eq!(status, 422);
                assert_eq!(message, "bad tags");
                assert_eq!(server_code.as_deref(), Some("INVALID"));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn missing_message_falls_back_to_status() {
        let err = status_to_error(500, "{}", true);
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn text_body_becomes_message() {
        let err = status_to_error(502, "Bad Gateway", false);
        assert_eq!(err.to_string(), "Bad Gateway");
    }

    #[test]
    fn not_found_and_conflict_are_specialised() {
        assert!(matches!(
            status_to_error(404, r#"{"error":"x"}"#, true),
            LiminalError::PromptNotFound(m) if m == "x"
        ));
        assert!(matches!(
            status_to_error(409, r#"{"error":"y"}"#, true),
            LiminalError::DuplicateSlug(m) if m == "y"
        ));
    }

    #[test]
    fn bearer_header_is_attached() {
        let headers = request_headers(Some("abc")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert!(request_headers(None).unwrap().get(AUTHORIZATION).is_none());
    }
}
