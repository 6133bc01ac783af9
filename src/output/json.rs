//! JSON rendering for `--json` mode.

use serde::Serialize;
use serde_json::json;

use crate::error::{LiminalError, Result};

pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Single-line error object written to stderr.
pub fn format_json_error(error: &LiminalError) -> String {
    json!({
        "error": true,
        "message": error.to_string(),
        "name": error.name(),
        "code": error.code(),
        "status": error.status(),
    })
    .to_string()
}
