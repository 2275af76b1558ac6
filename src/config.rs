//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-insights\config.toml
//! - macOS: ~/Library/Application Support/music-insights/config.toml
//! - Linux: ~/.config/music-insights/config.toml
//!
//! Every section is `#[serde(default)]`, so a partial file only overrides
//! what it names. Loading never fails: problems are logged and defaults used.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote analytics API settings
    pub api: ApiConfig,

    /// Search aggregator settings
    pub search: SearchConfig,

    /// Preview playback settings
    pub audio: AudioConfig,

    /// Page view settings
    pub ui: UiConfig,
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL without the version prefix
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Market used when a command doesn't name one
    pub default_market: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.musicinsights.in".to_string(),
            timeout_secs: 30,
            default_market: "IN".to_string(),
        }
    }
}

impl ApiConfig {
    /// Versioned endpoint root, e.g. `https://api.musicinsights.in/v1`.
    pub fn endpoint(&self) -> String {
        format!("{}/v1", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiescence window before a query is sent
    pub debounce_ms: u64,

    /// Result limit for the artist category
    pub artist_limit: u32,

    /// Result limit for the track category
    pub track_limit: u32,

    /// Result limit for the playlist category
    pub playlist_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            artist_limit: 10,
            track_limit: 20,
            playlist_limit: 10,
        }
    }
}

impl SearchConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Preview playback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Selected output device name (empty = system default)
    pub output_device: String,

    /// Preview volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            output_device: String::new(),
            volume: 0.7,
        }
    }
}

/// Page view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show built-in demo data when a page's fetch fails or comes back empty
    pub demo_fallback: bool,

    /// Markets preselected on the compare page
    pub compare_markets: Vec<String>,

    /// Maximum rows on the overview chart
    pub overview_track_limit: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            demo_fallback: false,
            compare_markets: vec!["IN".to_string(), "US".to_string(), "GB".to_string()],
            overview_track_limit: 50,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-insights"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if the directory can't be determined.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file.
///
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to a specific file, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write to a temp file then rename so a crash never leaves half a config
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Save configuration without blocking the async runtime
pub async fn save_async(config: Config, path: PathBuf) -> Result<(), ConfigError> {
    tokio::task::spawn_blocking(move || save_to(&config, &path))
        .await
        .map_err(|e| ConfigError::TaskJoin(e.to_string()))?
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Task join error: {0}")]
    TaskJoin(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[api]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[audio]"));
        assert!(toml.contains("[ui]"));
    }

    #[test]
    fn test_defaults_match_dashboard_behaviour() {
        let config = Config::default();
        assert_eq!(config.api.endpoint(), "https://api.musicinsights.in/v1");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.search.debounce_window(), Duration::from_millis(500));
        assert_eq!(
            (
                config.search.artist_limit,
                config.search.track_limit,
                config.search.playlist_limit
            ),
            (10, 20, 10)
        );
        assert!(!config.ui.demo_fallback);
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let api = ApiConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        assert_eq!(api.endpoint(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[ui]
demo_fallback = true
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.ui.demo_fallback);
        assert_eq!(config.ui.compare_markets, vec!["IN", "US", "GB"]);
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.audio.volume, 0.7);
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.api.default_market = "US".to_string();
        config.audio.volume = 0.25;
        save_to(&config, &path).unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.api.default_market, "US");
        assert_eq!(loaded.audio.volume, 0.25);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_unparseable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.api.default_market, "IN");
    }
}
