//! Spectator configuration.
//!
//! Loaded from `spectator_config.json`, overridable through the
//! `SPECTATOR_CONFIG_PATH` environment variable.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::color::Color;

pub const BUILTIN_SPECTATOR_CONFIG: &str = include_str!("data/spectator_config.json");
pub const CONFIG_PATH_ENV: &str = "SPECTATOR_CONFIG_PATH";

/// Highest possible `r + g + b`.
const MAX_CHANNEL_SUM: u32 = 255 * 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpectatorConfig {
    /// WebSocket URL of the game's spectate endpoint.
    pub endpoint: String,
    pub reconnect_delay_ms: u64,
    pub replay_interval_ms: u64,
    pub max_logs: usize,
    pub palette: PaletteConfig,
}

impl Default for SpectatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:3000/spectate".to_string(),
            reconnect_delay_ms: 2000,
            replay_interval_ms: 250,
            max_logs: 8,
            palette: PaletteConfig::default(),
        }
    }
}

/// Rules for drawing owner colors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Candidates whose channel sum is at or below this are redrawn.
    pub min_channel_sum: u32,
    pub max_attempts: u32,
    /// Used once `max_attempts` draws have all been rejected.
    pub fallback: Color,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            min_channel_sum: 400,
            max_attempts: 10_000,
            fallback: Color::rgb(0xf0, 0xf0, 0xf0),
        }
    }
}

impl PaletteConfig {
    pub fn validate(&self) -> Result<(), SpectatorConfigError> {
        if self.min_channel_sum >= MAX_CHANNEL_SUM {
            return Err(SpectatorConfigError::Invalid(format!(
                "palette.min_channel_sum {} leaves no acceptable color (max sum is {})",
                self.min_channel_sum, MAX_CHANNEL_SUM
            )));
        }
        if self.max_attempts == 0 {
            return Err(SpectatorConfigError::Invalid(
                "palette.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl SpectatorConfig {
    pub fn builtin() -> Self {
        // The embedded file is covered by `builtin_config_parses`.
        Self::from_json_str(BUILTIN_SPECTATOR_CONFIG).unwrap_or_default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, SpectatorConfigError> {
        let config: SpectatorConfig = serde_json::from_str(json)?;
        config.palette.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, SpectatorConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| SpectatorConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        SpectatorConfig::from_json_str(&contents)
    }
}

#[derive(Debug, Error)]
pub enum SpectatorConfigError {
    #[error("failed to parse spectator config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read spectator config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid spectator config: {0}")]
    Invalid(String),
}

/// Metadata about where the active configuration came from.
#[derive(Debug, Clone, Default)]
pub struct SpectatorConfigMetadata {
    path: Option<PathBuf>,
}

impl SpectatorConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Load configuration from an explicit path, else `SPECTATOR_CONFIG_PATH`,
/// falling back to the builtin copy.
pub fn load_spectator_config(
    explicit: Option<&Path>,
) -> (SpectatorConfig, SpectatorConfigMetadata) {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

    if let Some(path) = path {
        match SpectatorConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "spectator::config",
                    path = %path.display(),
                    "spectator_config.loaded=file"
                );
                return (config, SpectatorConfigMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "spectator::config",
                    path = %path.display(),
                    error = %err,
                    "spectator_config.load_failed"
                );
            }
        }
    }

    tracing::info!(
        target: "spectator::config",
        "spectator_config.loaded=builtin"
    );
    (SpectatorConfig::builtin(), SpectatorConfigMetadata::new(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_parses() {
        let config = SpectatorConfig::from_json_str(BUILTIN_SPECTATOR_CONFIG).unwrap();
        assert_eq!(config.palette, PaletteConfig::default());
        assert!(config.endpoint.ends_with("/spectate"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = SpectatorConfig::from_json_str(r#"{"max_logs": 3}"#).unwrap();
        assert_eq!(config.max_logs, 3);
        assert_eq!(config.palette.min_channel_sum, 400);
        assert_eq!(config.reconnect_delay_ms, 2000);
    }

    #[test]
    fn impossible_palette_is_rejected() {
        let err = SpectatorConfig::from_json_str(r#"{"palette": {"min_channel_sum": 765}}"#)
            .unwrap_err();
        assert!(matches!(err, SpectatorConfigError::Invalid(_)));

        let err =
            SpectatorConfig::from_json_str(r#"{"palette": {"max_attempts": 0}}"#).unwrap_err();
        assert!(matches!(err, SpectatorConfigError::Invalid(_)));
    }

    #[test]
    fn bad_fallback_color_fails_to_parse() {
        let err = SpectatorConfig::from_json_str(r##"{"palette": {"fallback": "white"}}"##)
            .unwrap_err();
        assert!(matches!(err, SpectatorConfigError::Parse(_)));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = SpectatorConfig::from_file(Path::new("/nonexistent/spectator.json")).unwrap_err();
        assert!(matches!(err, SpectatorConfigError::Read { .. }));
    }

    #[test]
    fn explicit_missing_path_falls_back_to_builtin() {
        let (config, metadata) =
            load_spectator_config(Some(Path::new("/nonexistent/spectator.json")));
        assert!(metadata.path().is_none());
        assert_eq!(config.palette.min_channel_sum, 400);
    }

    fn write_temp_config(name: &str, json: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
        fs::write(&path, json).expect("write temp config");
        path
    }

    #[test]
    fn explicit_path_is_loaded() {
        let path = write_temp_config(
            "spectator-explicit",
            r#"{"max_logs": 3, "palette": {"min_channel_sum": 500}}"#,
        );
        let (config, metadata) = load_spectator_config(Some(&path));
        fs::remove_file(&path).ok();

        assert_eq!(config.max_logs, 3);
        assert_eq!(config.palette.min_channel_sum, 500);
        assert_eq!(config.reconnect_delay_ms, 2000);
        assert_eq!(metadata.path(), Some(&path));
    }

    #[test]
    fn env_path_is_loaded() {
        let path = write_temp_config(
            "spectator-env",
            r#"{"endpoint": "ws://10.0.0.7:9000/spectate", "max_logs": 3}"#,
        );
        env::set_var(CONFIG_PATH_ENV, &path);
        let (config, metadata) = load_spectator_config(None);
        env::remove_var(CONFIG_PATH_ENV);
        fs::remove_file(&path).ok();

        assert_eq!(config.endpoint, "ws://10.0.0.7:9000/spectate");
        assert_eq!(config.max_logs, 3);
        assert_eq!(metadata.path(), Some(&path));
    }
}
