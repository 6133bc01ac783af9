//! CLI auth command handlers for login, logout, and whoami.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::auth::{AuthError, DeviceFlow, TokenStore};
use crate::client::ApiClient;
use crate::config::LiminalConfig;
use crate::error::Result;
use crate::output::human;

use super::emit;

/// Handle `liminaldb login`.
pub async fn handle_login(config: &LiminalConfig, client_id: Option<String>) -> Result<()> {
    let client_id = client_id
        .or_else(|| config.client_id.clone())
        .filter(|id| !id.trim().is_empty())
        .ok_or(AuthError::MissingClientId)?;

    let store: Arc<dyn TokenStore> = Arc::new(config.token_store());
    let cancel = CancellationToken::new();
    let flow = DeviceFlow::new(store).with_cancellation(cancel.clone());

    println!("Requesting device authorization...");
    let device = flow.request_device_code(&client_id).await?;

    println!(
        "\nOpen this URL in your browser:\n  {}\n",
        device.verification_uri_complete
    );
    println!(
        "Or go to {} and enter code: {}\n",
        device.verification_uri, device.user_code
    );
    println!("Waiting for authentication...");
    open_browser(&device.verification_uri_complete);

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    let result = flow.poll(&client_id, &device).await;
    interrupt.abort();
    result?;

    println!("Authenticated successfully.");
    Ok(())
}

/// Handle `liminaldb logout`.
pub fn handle_logout(config: &LiminalConfig) -> Result<()> {
    config.token_store().clear()?;
    println!("Logged out. Stored tokens cleared.");
    Ok(())
}

/// Handle `liminaldb whoami`.
pub async fn handle_whoami(config: &LiminalConfig) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let data = client.whoami().await?;
    emit(config, &data, human::format_whoami)
}

// Best-effort; the URL is already on screen.
fn open_browser(url: &str) {
    if let Err(err) = open::that(url) {
        tracing::debug!(error = %err, "could not open browser");
    }
}
