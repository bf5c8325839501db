//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable overriding [`AppConfig::store_dir`].
pub const STORE_DIR_ENV: &str = "RIDEBOARD_STORE_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the file-backed record store.
    pub store_dir: PathBuf,
    pub preferences_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".rideboard/store"),
            preferences_path: PathBuf::from(".rideboard/preferences.json"),
        }
    }
}

impl AppConfig {
    /// Load from a YAML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
    }

    /// Config file (if any), then the environment, then an explicit store
    /// directory. Later sources win.
    pub fn resolve(config_path: Option<&Path>, store_override: Option<&Path>) -> AppResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env_override(std::env::var_os(STORE_DIR_ENV).map(PathBuf::from));
        if let Some(dir) = store_override {
            config.store_dir = dir.to_path_buf();
        }
        Ok(config)
    }

    fn apply_env_override(&mut self, store_dir: Option<PathBuf>) {
        if let Some(dir) = store_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.store_dir = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("store_dir: /srv/rides\n").unwrap();
        assert_eq!(config.store_dir, PathBuf::from("/srv/rides"));
        assert_eq!(
            config.preferences_path,
            PathBuf::from(".rideboard/preferences.json")
        );
    }

    #[test]
    fn explicit_store_wins() {
        let config = AppConfig::resolve(None, Some(Path::new("/tmp/elsewhere"))).unwrap();
        assert_eq!(config.store_dir, PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn env_override_ignores_empty_value() {
        let mut config = AppConfig::default();
        config.apply_env_override(Some(PathBuf::new()));
        assert_eq!(config.store_dir, AppConfig::default().store_dir);
        config.apply_env_override(Some(PathBuf::from("/data")));
        assert_eq!(config.store_dir, PathBuf::from("/data"));
    }

    #[test]
    fn missing_file_is_reported() {
        let path = std::env::temp_dir().join("rb_app_missing_config.yaml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            AppConfig::load(&path),
            Err(AppError::ConfigRead { .. })
        ));
    }
}
