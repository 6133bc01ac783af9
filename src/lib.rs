//! liminaldb: client library and CLI for the LiminalDB prompt service.
//!
//! Authentication uses the OAuth device authorization grant, with the
//! resulting credential kept in `~/.config/liminaldb/tokens.json`. A static
//! `LIMINALDB_API_KEY` bypasses the stored credential.
//!
//! # Quick Start
//!
//! ```no_run
//! use liminaldb::client::{ApiClient, ListOptions};
//! use liminaldb::config::LiminalConfig;
//!
//! # async fn example() -> liminaldb::error::Result<()> {
//! let client = ApiClient::from_config(&LiminalConfig::load())?;
//! let prompts = client.list_prompts(&ListOptions::default()).await?;
//! println!("{} prompts", prompts.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub mod logging;
