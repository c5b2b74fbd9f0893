// src/keystore.rs
//! Local key store for user-supplied credentials.
//!
//! Keys live in a small JSON file under the user's config directory, keyed by
//! fixed names. Only the CLI reads or writes this file; the pipeline receives
//! keys as call parameters and never touches it.

use crate::constants::{EXTRACTOR_KEY_NAME, KEY_STORE_DIR, KEY_STORE_FILE, LLM_KEY_NAME};
use crate::error::AppError;
use crate::types::ApiKey;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys as persisted on disk. Field names are the fixed store key names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firecrawl_api_key: Option<String>,
}

impl StoredKeys {
    /// Redacted `(name, value)` pairs for display.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let show = |value: &Option<String>| match ApiKey::from_optional(value.as_deref()) {
            Ok(Some(key)) => key.to_string(),
            Ok(None) => "(not set)".to_string(),
            Err(_) => "(invalid)".to_string(),
        };
        vec![
            (LLM_KEY_NAME, show(&self.openai_api_key)),
            (EXTRACTOR_KEY_NAME, show(&self.firecrawl_api_key)),
        ]
    }
}

/// File-backed key store.
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    /// Opens the store under the platform config directory
    /// (`$XDG_CONFIG_HOME/docs2guide/keys.json` or `~/.config/...` on Linux).
    pub fn open_default() -> Result<Self, AppError> {
        Self::default_path().map(Self::at)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn default_path() -> Result<PathBuf, AppError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            AppError::MissingConfiguration(
                "No config directory found for the key store (is HOME set?)".to_string(),
            )
        })?;
        Ok(config_dir.join(KEY_STORE_DIR).join(KEY_STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads stored keys; a missing file is an empty store.
    pub fn load(&self) -> Result<StoredKeys, AppError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| AppError::JsonParseError {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredKeys::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Merges new values into the store; `None` leaves the existing key alone.
    pub fn update(
        &self,
        llm_key: Option<&str>,
        extractor_key: Option<&str>,
    ) -> Result<StoredKeys, AppError> {
        let mut keys = self.load()?;
        if let Some(key) = ApiKey::from_optional(llm_key)? {
            keys.openai_api_key = Some(key.as_str().to_string());
        }
        if let Some(key) = ApiKey::from_optional(extractor_key)? {
            keys.firecrawl_api_key = Some(key.as_str().to_string());
        }
        self.save(&keys)?;
        Ok(keys)
    }

    /// Removes the key file if present.
    pub fn clear(&self) -> Result<(), AppError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, keys: &StoredKeys) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = open_private(&self.path)?;
        file.write_all(serde_json::to_string_pretty(keys)?.as_bytes())?;
        log::debug!("Saved keys to {}", self.path.display());
        Ok(())
    }
}

/// Opens the key file for writing, readable by the owner only on unix. An
/// existing file is narrowed to owner-only before it is truncated.
#[cfg(unix)]
fn open_private(path: &Path) -> Result<File, AppError> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.set_len(0)?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<File, AppError> {
    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::at(dir.path().join("keys.json"));
        assert_eq!(store.load().unwrap(), StoredKeys::default());
    }

    #[test]
    fn update_merges_and_persists_under_fixed_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::at(dir.path().join("nested").join("keys.json"));

        store.update(Some("sk-first"), None).unwrap();
        store.update(None, Some("fc-second")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[LLM_KEY_NAME], "sk-first");
        assert_eq!(raw[EXTRACTOR_KEY_NAME], "fc-second");
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::at(dir.path().join("keys.json"));
        store.update(Some("sk-x"), None).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), StoredKeys::default());
    }

    #[cfg(unix)]
    #[test]
    fn saved_key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::at(dir.path().join("keys.json"));

        store.update(Some("sk-private"), None).unwrap();
        store.update(Some("sk-rotated"), None).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().openai_api_key.as_deref(), Some("sk-rotated"));
    }

    #[test]
    fn shorter_keys_replace_the_previous_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::at(dir.path().join("keys.json"));

        store
            .update(Some("sk-a-much-longer-key-value"), Some("fc-key"))
            .unwrap();
        store.update(Some("sk-b"), None).unwrap();

        assert_eq!(
            store.load().unwrap(),
            StoredKeys {
                openai_api_key: Some("sk-b".into()),
                firecrawl_api_key: Some("fc-key".into()),
            }
        );
    }

    #[test]
    fn default_store_lives_under_the_config_directory() {
        // Only meaningful where the platform reports a config directory.
        if let Some(config_dir) = dirs::config_dir() {
            let store = KeyStore::open_default().unwrap();
            assert_eq!(
                store.path(),
                config_dir.join(KEY_STORE_DIR).join(KEY_STORE_FILE)
            );
            assert!(store.path().is_absolute());
        }
    }

    #[test]
    fn describe_redacts_values() {
        let keys = StoredKeys {
            openai_api_key: Some("sk-verysecret".into()),
            firecrawl_api_key: None,
        };
        let described = keys.describe();
        assert_eq!(described[0], (LLM_KEY_NAME, "sk-v...".to_string()));
        assert_eq!(described[1], (EXTRACTOR_KEY_NAME, "(not set)".to_string()));
    }
}
