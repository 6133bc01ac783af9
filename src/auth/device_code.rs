use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::clock::{PollClock, SystemClock};
use super::credential::Credential;
use super::error::AuthError;
use super::store::TokenStore;

const DEFAULT_DEVICE_AUTHORIZATION_URL: &str =
    "https://api.workos.com/user_management/authorize/device";
const DEFAULT_TOKEN_URL: &str = "https://api.workos.com/user_management/authenticate";
const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Lower bound on the poll interval, whatever the server advertises.
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;
/// Extra one-shot delay applied after each `slow_down` response.
pub const SLOW_DOWN_PENALTY_SECS: u64 = 5;
/// Upper bound on any single request to the identity provider.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Shortest window granted to a token exchange, even past the deadline.
const MIN_EXCHANGE_WINDOW: Duration = Duration::from_secs(1);

/// Device authorization issued for one login attempt.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: String,
    pub expires_in: u64,
    pub interval: u64,
}

impl fmt::Debug for DeviceAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceAuthorization")
            .field("device_code", &"<redacted>")
            .field("user_code", &self.user_code)
            .field("verification_uri", &self.verification_uri)
            .field("verification_uri_complete", &self.verification_uri_complete)
            .field("expires_in", &self.expires_in)
            .field("interval", &self.interval)
            .finish()
    }
}

/// Error codes returned by the token endpoint while polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantError {
    /// `authorization_pending`: keep polling at the regular interval.
    Pending,
    /// `slow_down`: keep polling after a one-shot penalty.
    SlowDown,
    /// `access_denied`
    Denied,
    /// `expired_token`
    Expired,
    Unknown(String),
}

impl GrantError {
    pub fn from_code(code: &str) -> Self {
        match code {
            "authorization_pending" => Self::Pending,
            "slow_down" => Self::SlowDown,
            "access_denied" => Self::Denied,
            "expired_token" => Self::Expired,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Pending => "authorization_pending",
            Self::SlowDown => "slow_down",
            Self::Denied => "access_denied",
            Self::Expired => "expired_token",
            Self::Unknown(code) => code,
        }
    }
}

/// OAuth device-authorization flow against the LiminalDB identity provider.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use liminaldb::auth::{DeviceFlow, FileTokenStore};
///
/// # async fn example() -> Result<(), liminaldb::auth::AuthError> {
/// let flow = DeviceFlow::new(Arc::new(FileTokenStore::new_default()));
/// let device = flow.request_device_code("client_123").await?;
/// println!("Visit {} and enter {}", device.verification_uri, device.user_code);
/// let credential = flow.poll("client_123", &device).await?;
/// # let _ = credential;
/// # Ok(())
/// # }
/// ```
pub struct DeviceFlow {
    client: reqwest::Client,
    device_authorization_url: String,
    token_url: String,
    token_store: Arc<dyn TokenStore>,
    clock: Arc<dyn PollClock>,
    cancel: Option<CancellationToken>,
}

impl DeviceFlow {
    pub fn new(token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            device_authorization_url: DEFAULT_DEVICE_AUTHORIZATION_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            token_store,
            clock: Arc::new(SystemClock),
            cancel: None,
        }
    }

    pub fn with_device_authorization_url(mut self, url: impl Into<String>) -> Self {
        self.device_authorization_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn PollClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Abandon polling once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub async fn request_device_code(
        &self,
        client_id: &str,
    ) -> Result<DeviceAuthorization, AuthError> {
        if client_id.trim().is_empty() {
            return Err(AuthError::MissingClientId);
        }
        tracing::debug!(url = %self.device_authorization_url, "requesting device code");
        let request = async {
            let resp = self
                .client
                .post(&self.device_authorization_url)
                .header("Accept", "application/json")
                .form(&[("client_id", client_id)])
                .send()
                .await?;
            let status = resp.status();
            Ok::<_, AuthError>((status, resp.text().await?))
        };
        let (status, body) = self.until_cancelled(request).await?;
        if !status.is_success() {
            return Err(AuthError::DeviceAuthorization {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|err| {
            AuthError::InvalidResponse(format!("device authorization payload: {err}"))
        })
    }

    /// Poll using the code and timing issued in `device`.
    pub async fn poll(
        &self,
        client_id: &str,
        device: &DeviceAuthorization,
    ) -> Result<Credential, AuthError> {
        self.poll_for_token(client_id, &device.device_code, device.interval, device.expires_in)
            .await
    }

    /// Poll the token endpoint until the user approves, the server rejects the
    /// request, or `expires_in` seconds elapse. The credential is persisted
    /// before it is returned.
    pub async fn poll_for_token(
        &self,
        client_id: &str,
        device_code: &str,
        interval: u64,
        expires_in: u64,
    ) -> Result<Credential, AuthError> {
        if client_id.trim().is_empty() {
            return Err(AuthError::MissingClientId);
        }
        let deadline = add_seconds(self.clock.now(), expires_in);
        let poll_interval = Duration::from_secs(interval.max(MIN_POLL_INTERVAL_SECS));

        while self.clock.now() < deadline {
            self.pause(poll_interval).await?;

            let (status, body) = self.exchange(client_id, device_code, deadline).await?;

            if status.is_success() {
                let payload: TokenResponse = serde_json::from_str(&body).map_err(|err| {
                    AuthError::InvalidResponse(format!("token payload: {err}"))
                })?;
                let credential = payload.into_credential(self.clock.now())?;
                self.token_store.save(&credential)?;
                tracing::debug!("device authorization approved");
                return Ok(credential);
            }

            let rejection: TokenErrorResponse = serde_json::from_str(&body).map_err(|_| {
                AuthError::InvalidResponse(format!(
                    "Token request failed with status {}: {body}",
                    status.as_u16()
                ))
            })?;
            let grant_error = GrantError::from_code(&rejection.error);
            tracing::debug!(code = grant_error.code(), "token poll rejected");
            match grant_error {
                GrantError::Pending => continue,
                GrantError::SlowDown => {
                    self.pause(Duration::from_secs(SLOW_DOWN_PENALTY_SECS)).await?;
                    continue;
                }
                GrantError::Denied | GrantError::Expired | GrantError::Unknown(_) => {
                    return Err(AuthError::AuthorizationFailed {
                        code: grant_error.code().to_string(),
                        description: rejection.error_description,
                    });
                }
            }
        }

        Err(AuthError::TimedOut)
    }

    /// One token request, bounded by the time left before `deadline` and by
    /// cancellation.
    async fn exchange(
        &self,
        client_id: &str,
        device_code: &str,
        deadline: DateTime<Utc>,
    ) -> Result<(reqwest::StatusCode, String), AuthError> {
        let window = (deadline - self.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO)
            .clamp(MIN_EXCHANGE_WINDOW, Duration::from_secs(REQUEST_TIMEOUT_SECS));
        let request = async {
            let resp = self
                .client
                .post(&self.token_url)
                .header("Accept", "application/json")
                .form(&[
                    ("grant_type", DEVICE_CODE_GRANT_TYPE),
                    ("device_code", device_code),
                    ("client_id", client_id),
                ])
                .send()
                .await?;
            let status = resp.status();
            Ok::<_, AuthError>((status, resp.text().await?))
        };
        let bounded = async {
            match tokio::time::timeout(window, request).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::debug!(?window, "token request outlived the authorization window");
                    Err(AuthError::TimedOut)
                }
            }
        };
        self.until_cancelled(bounded).await
    }

    async fn until_cancelled<T>(
        &self,
        work: impl Future<Output = Result<T, AuthError>>,
    ) -> Result<T, AuthError> {
        let Some(cancel) = &self.cancel else {
            return work.await;
        };
        tokio::select! {
            _ = cancel.cancelled() => Err(AuthError::Cancelled),
            result = work => result,
        }
    }

    async fn pause(&self, duration: Duration) -> Result<(), AuthError> {
        let Some(cancel) = &self.cancel else {
            self.clock.sleep(duration).await;
            return Ok(());
        };
        if cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(AuthError::Cancelled),
            _ = self.clock.sleep(duration) => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_credential(self, now: DateTime<Utc>) -> Result<Credential, AuthError> {
        if self.access_token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "token payload has an empty access_token".to_string(),
            ));
        }
        Ok(Credential {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| add_seconds(now, secs)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

fn add_seconds(at: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
