use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential produced by a completed device-flow login.
///
/// Serialized with camelCase keys and an epoch-millisecond `expiresAt`, which
/// is the on-disk shape of `tokens.json`.
///
/// # Example
/// ```
/// use liminaldb::auth::Credential;
/// use chrono::{Duration, Utc};
///
/// let credential = Credential {
///     access_token: "access".to_string(),
///     refresh_token: None,
///     expires_at: Some(Utc::now() + Duration::hours(1)),
/// };
/// assert!(credential.is_valid_at(Utc::now()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// A credential without `expires_at` never expires.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        self.expires_at.map(|exp| exp > now).unwrap_or(true)
    }
}
