//! Optional TOML configuration.
//!
//! Every field has a default, so a missing file, a missing section or a
//! missing key all fall back to the built-in values.

use crate::application::Timings;
use crate::infrastructure::audio::Voice;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled: bool,
    /// Start background music; ignored while sound is disabled
    pub music: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            music: true,
        }
    }
}

/// Delays in milliseconds unless the key says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Event loop poll interval
    pub tick_ms: u64,
    pub greeting_delay_ms: u64,
    pub match_delay_ms: u64,
    pub flip_back_ms: u64,
    pub error_cue_delay_ms: u64,
    pub idle_hint_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let timings = Timings::default();
        Self {
            tick_ms: 100,
            greeting_delay_ms: timings.greeting_delay.as_millis() as u64,
            match_delay_ms: timings.match_delay.as_millis() as u64,
            flip_back_ms: timings.flip_back.as_millis() as u64,
            error_cue_delay_ms: timings.error_cue_delay.as_millis() as u64,
            idle_hint_secs: timings.idle_hint.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sound: SoundConfig,
    pub speech: Voice,
    pub timing: TimingConfig,
}

impl Config {
    /// Location of the per-user config file, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("id", "ceria", "ceria").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads `path`, or the per-user file when no path is given.
    ///
    /// An explicit path must exist. The per-user file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.timing.tick_ms.max(1))
    }

    pub fn timings(&self) -> Timings {
        let t = &self.timing;
        Timings {
            greeting_delay: Duration::from_millis(t.greeting_delay_ms),
            match_delay: Duration::from_millis(t.match_delay_ms),
            flip_back: Duration::from_millis(t.flip_back_ms),
            error_cue_delay: Duration::from_millis(t.error_cue_delay_ms),
            idle_hint: Duration::from_secs(t.idle_hint_secs),
            ..Timings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_match_timings() {
        let config = Config::default();
        assert!(config.sound.enabled);
        assert!(config.sound.music);
        assert_eq!(config.speech, Voice::default());
        assert_eq!(config.timings(), Timings::default());
        assert_eq!(config.tick(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let file = write_config(
            r#"
[sound]
enabled = false

[timing]
flip_back_ms = 1500
"#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert!(!config.sound.enabled);
        assert!(config.sound.music);
        assert_eq!(config.timings().flip_back, Duration::from_millis(1500));
        assert_eq!(config.timings().match_delay, Duration::from_millis(500));
        assert_eq!(config.speech.lang, "id-ID");
    }

    #[test]
    fn test_music_can_be_turned_off() {
        let file = write_config("[sound]\nmusic = false\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.sound.enabled);
        assert!(!config.sound.music);
    }

    #[test]
    fn test_speech_section() {
        let file = write_config("[speech]\nlang = \"en-US\"\nrate = 0.8\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.speech.lang, "en-US");
        assert_eq!(config.speech.rate, 0.8);
        assert_eq!(config.speech.pitch, 1.2);
    }

    #[test]
    fn test_zero_tick_is_clamped() {
        let file = write_config("[timing]\ntick_ms = 0\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.tick(), Duration::from_millis(1));
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let file = write_config("[sound\nenabled = ");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }
}
