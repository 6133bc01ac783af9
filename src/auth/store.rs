use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::credential::Credential;
use super::error::AuthError;

/// Storage abstraction for the persisted login credential.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, AuthError>;
    fn save(&self, credential: &Credential) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// Configuration for file-backed token storage.
#[derive(Debug, Clone)]
pub struct TokenStoreConfig {
    pub path: PathBuf,
}

impl TokenStoreConfig {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.config/liminaldb/tokens.json`
    pub fn default_path() -> PathBuf {
        default_config_dir().join("tokens.json")
    }
}

/// JSON file token store.
///
/// A missing, unreadable or malformed file loads as "no credential".
///
/// # Example
/// ```no_run
/// use liminaldb::auth::{Credential, FileTokenStore, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// store.save(&Credential {
///     access_token: "access".to_string(),
///     refresh_token: None,
///     expires_at: None,
/// })?;
/// # Ok::<(), liminaldb::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(config: TokenStoreConfig) -> Self {
        Self { path: config.path }
    }

    pub fn new_default() -> Self {
        Self {
            path: TokenStoreConfig::default_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Credential>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "token file unreadable");
                return Ok(None);
            }
        };
        match serde_json::from_str::<Credential>(&raw) {
            Ok(credential) if !credential.access_token.is_empty() => Ok(Some(credential)),
            Ok(_) => Ok(None),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "token file malformed");
                Ok(None)
            }
        }
    }

    fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        let serialized = serde_json::to_vec_pretty(credential)?;
        atomic_write(&self.path, &serialized)?;
        tracing::debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

/// `~/.config/liminaldb`, falling back to a relative directory without a home.
pub fn default_config_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("liminaldb"))
        .unwrap_or_else(|| PathBuf::from(".liminaldb"))
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path.file_name().ok_or_else(|| {
        AuthError::Io(format!("Token path {} has no file name", path.display()))
    })?;

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_name = format!(
        ".{}.tmp-{}-{nonce}",
        file_name.to_string_lossy(),
        std::process::id()
    );
    let temp_path = path.with_file_name(temp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let write_result = (|| -> std::io::Result<()> {
        let mut temp_file = options.open(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}
