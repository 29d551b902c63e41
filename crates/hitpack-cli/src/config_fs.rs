// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed [`ConfigStore`] (uses the platform config dir).

use crate::config::{ConfigError, ConfigStore};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Store configs as JSON files, one per key.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Store rooted at the user config directory (e.g. `~/.config/hitpack`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "hitpack")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Ok(Self::at(proj.config_dir()))
    }

    /// Store rooted at `base`. The directory is created on first save.
    pub fn at(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Directory holding the config files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        read(&self.path_for(key))
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

/// Deserialize a config value from an explicit file. A missing file is an error.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    Ok(serde_json::from_slice(&read(path)?)?)
}

fn read(path: &Path) -> Result<Vec<u8>, ConfigError> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::{CliConfig, ConfigService, CLI_CONFIG_KEY};

    #[test]
    fn saves_under_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::at(dir.path().join("nested"));
        let service = ConfigService::new(store);
        let config = CliConfig {
            pretty: true,
            ..CliConfig::default()
        };
        service.save(CLI_CONFIG_KEY, &config).unwrap();
        assert!(dir.path().join("nested/cli.json").is_file());
        assert_eq!(service.load(CLI_CONFIG_KEY).unwrap(), Some(config));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::at(dir.path());
        assert!(matches!(store.load_raw("cli"), Err(ConfigError::NotFound)));
        assert!(matches!(
            load_file::<CliConfig>(&dir.path().join("absent.json")),
            Err(ConfigError::NotFound)
        ));
    }
}
