//! Configuration system (layered: defaults < env < config file < CLI flags).
//!
//! The resolved [`LiminalConfig`] is an explicit value handed to every
//! command; nothing here is cached process-wide.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::auth::store::default_config_dir;
use crate::auth::{FileTokenStore, TokenResolver, TokenStoreConfig};

pub const PRODUCTION_URL: &str = "https://liminaldb.com";
pub const STAGING_URL: &str = "https://promptdb-staging.fly.dev";

pub const ENV_URL: &str = "LIMINALDB_URL";
pub const ENV_OUTPUT_FORMAT: &str = "LIMINALDB_OUTPUT_FORMAT";
pub const ENV_VERBOSE: &str = "LIMINALDB_VERBOSE";
pub const ENV_API_KEY: &str = "LIMINALDB_API_KEY";
pub const ENV_CLIENT_ID: &str = "WORKOS_CLIENT_ID";

/// Config files looked up in the working directory, in order.
const LOCAL_CONFIG_FILES: [&str; 3] = [".liminaldbrc", ".liminaldbrc.toml", ".liminaldbrc.json"];

/// How command results are rendered.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Resolved CLI configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct LiminalConfig {
    pub url: String,
    pub output_format: OutputFormat,
    pub verbose: bool,
    /// Bearer token that bypasses stored OAuth credentials.
    pub api_key: Option<String>,
    pub client_id: Option<String>,
    pub token_path: PathBuf,
}

impl fmt::Debug for LiminalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiminalConfig")
            .field("url", &self.url)
            .field("output_format", &self.output_format)
            .field("verbose", &self.verbose)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("client_id", &self.client_id)
            .field("token_path", &self.token_path)
            .finish()
    }
}

impl Default for LiminalConfig {
    fn default() -> Self {
        Self {
            url: PRODUCTION_URL.to_string(),
            output_format: OutputFormat::Human,
            verbose: false,
            api_key: None,
            client_id: None,
            token_path: TokenStoreConfig::default_path(),
        }
    }
}

/// Flags from the command line that override every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub json: bool,
    pub verbose: bool,
    pub url: Option<String>,
}

impl LiminalConfig {
    /// Defaults plus environment (a `.env` file is loaded first if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults plus variables read through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let mut config = Self::default();
        if let Some(url) = non_empty(ENV_URL) {
            config.url = url;
        }
        config.output_format = match non_empty(ENV_OUTPUT_FORMAT).as_deref() {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Human,
        };
        config.verbose = matches!(non_empty(ENV_VERBOSE).as_deref(), Some("1" | "true"));
        config.api_key = non_empty(ENV_API_KEY);
        config.client_id = non_empty(ENV_CLIENT_ID);
        config
    }

    /// Environment plus the first config file found in the working directory
    /// or `~/.config/liminaldb`.
    pub fn load() -> Self {
        let mut config = Self::from_env();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        if let Some(file) = FileConfig::discover(&cwd, &default_config_dir()) {
            config.merge_file(file);
        }
        config
    }

    pub fn merge_file(&mut self, file: FileConfig) {
        if let Some(url) = file.url {
            self.url = url;
        }
        if let Some(format) = file.output_format {
            self.output_format = format;
        }
        if let Some(verbose) = file.verbose {
            self.verbose = verbose;
        }
    }

    pub fn apply_cli_overrides(mut self, overrides: CliOverrides) -> Self {
        if overrides.json {
            self.output_format = OutputFormat::Json;
        }
        if overrides.verbose {
            self.verbose = true;
        }
        if let Some(url) = overrides.url {
            self.url = url;
        }
        self
    }

    pub fn with_token_path(mut self, path: PathBuf) -> Self {
        self.token_path = path;
        self
    }

    pub fn is_json(&self) -> bool {
        self.output_format == OutputFormat::Json
    }

    pub fn token_store(&self) -> FileTokenStore {
        FileTokenStore::new(TokenStoreConfig::new(self.token_path.clone()))
    }

    /// Resolver honoring `api_key` before the stored credential.
    pub fn token_resolver(&self) -> TokenResolver {
        TokenResolver::new(std::sync::Arc::new(self.token_store()))
            .with_override(self.api_key.clone())
    }
}

/// User-editable settings from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub url: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub verbose: Option<bool>,
}

impl FileConfig {
    /// Parse the first existing candidate. Invalid files are ignored.
    pub fn discover(cwd: &Path, config_dir: &Path) -> Option<Self> {
        let candidates = LOCAL_CONFIG_FILES
            .iter()
            .map(|name| cwd.join(name))
            .chain(std::iter::once(config_dir.join("config.toml")));
        for path in candidates {
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(_) => continue,
            };
            tracing::debug!(path = %path.display(), "loading config file");
            return match Self::parse(&path, &raw) {
                Ok(file) => Some(file),
                Err(reason) => {
                    tracing::warn!(path = %path.display(), %reason, "ignoring invalid config file");
                    None
                }
            };
        }
        None
    }

    fn parse(path: &Path, raw: &str) -> Result<Self, String> {
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let file: Self = if is_json {
            serde_json::from_str(raw).map_err(|e| e.to_string())?
        } else {
            toml::from_str(raw).map_err(|e| e.to_string())?
        };
        if let Some(url) = &file.url {
            reqwest::Url::parse(url).map_err(|e| format!("invalid url {url:?}: {e}"))?;
        }
        Ok(file)
    }
}
