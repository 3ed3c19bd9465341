use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::ConfigError;
use crate::session::{clamp_threshold, DEFAULT_HESITATION_THRESHOLD_SECS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub hesitation_threshold_secs: f64,
    pub show_live_stats: bool,
    pub user_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hesitation_threshold_secs: DEFAULT_HESITATION_THRESHOLD_SECS,
            show_live_stats: true,
            user_name: None,
        }
    }
}

impl Config {
    /// Bring hand-edited values back into range
    pub fn normalized(mut self) -> Self {
        self.hesitation_threshold_secs = clamp_threshold(self.hesitation_threshold_secs);
        self.user_name = self
            .user_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }
}

/// Settings given for one run only (command line flags). Applied on top of
/// the stored `Config` and never saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub hesitation_threshold_secs: Option<f64>,
    pub hide_live_stats: bool,
    pub user_name: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(threshold) = self.hesitation_threshold_secs {
            config.hesitation_threshold_secs = threshold;
        }
        if self.hide_live_stats {
            config.show_live_stats = false;
        }
        if let Some(name) = &self.user_name {
            config.user_name = Some(name.clone());
        }
        config.normalized()
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path =
            AppDirs::config_path().unwrap_or_else(|| PathBuf::from("thinktype_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.normalized(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            hesitation_threshold_secs: 2.2,
            show_live_stats: false,
            user_name: Some("ada".into()),
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn garbage_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn overrides_only_touch_what_they_name() {
        let stored = Config {
            hesitation_threshold_secs: 2.2,
            show_live_stats: true,
            user_name: Some("ada".into()),
        };
        assert_eq!(ConfigOverrides::default().apply(stored.clone()), stored);

        let overrides = ConfigOverrides {
            hesitation_threshold_secs: Some(0.7),
            hide_live_stats: true,
            user_name: Some(" guest ".into()),
        };
        let effective = overrides.apply(stored);
        assert_eq!(effective.hesitation_threshold_secs, 0.7);
        assert!(!effective.show_live_stats);
        assert_eq!(effective.user_name.as_deref(), Some("guest"));
    }

    #[test]
    fn out_of_range_values_are_normalized_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            br#"{"hesitation_threshold_secs": 9.0, "user_name": "  "}"#,
        )
        .unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.hesitation_threshold_secs, 3.0);
        assert_eq!(cfg.user_name, None);
        assert!(cfg.show_live_stats);
    }
}
