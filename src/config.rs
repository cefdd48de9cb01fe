use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::pulse;

/// Longest accepted timing unit (10 seconds per dot)
pub const MAX_UNIT_MS: u64 = 10_000;

/// Invalid configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Zero-length timing unit
    #[error("timing.unit_ms must be greater than zero")]
    ZeroUnit,

    /// Timing unit above [`MAX_UNIT_MS`]
    #[error("timing.unit_ms {0} must be at most {MAX_UNIT_MS}")]
    UnitTooLong(u64),

    /// Zero words-per-minute speed
    #[error("timing.wpm must be greater than zero")]
    ZeroWpm,

    /// Zero sample rate
    #[error("tone.sample_rate must be greater than zero")]
    ZeroSampleRate,

    /// Tone above the Nyquist frequency
    #[error("tone.frequency_hz {frequency} must be between 1 and {nyquist} Hz")]
    Frequency {
        /// Configured frequency
        frequency: u32,
        /// Half the sample rate
        nyquist: u32,
    },

    /// Volume outside 0.0..=1.0
    #[error("tone.volume {0} must be between 0.0 and 1.0")]
    Volume(f32),

    /// Fuzzy threshold outside 0.0..=1.0
    #[error("phrasebook.fuzzy_threshold {0} must be between 0.0 and 1.0")]
    Threshold(f64),
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub timing: TimingConfig,
    pub tone: ToneConfig,
    pub phrasebook: PhrasebookConfig,
    pub speech: SpeechConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimingConfig {
    /// Length of one dot in milliseconds
    pub unit_ms: u64,
    /// Speed in words per minute; overrides `unit_ms` when set
    pub wpm: Option<u32>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            unit_ms: 100,
            wpm: None,
        }
    }
}

impl TimingConfig {
    /// Base unit for pulse plans
    pub fn unit(&self) -> Duration {
        self.wpm
            .and_then(pulse::unit_from_wpm)
            .unwrap_or_else(|| Duration::from_millis(self.unit_ms))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ToneConfig {
    pub frequency_hz: u32,
    pub sample_rate: u32,
    /// Peak amplitude, 0.0 to 1.0
    pub volume: f32,
    /// Attack/release ramp to avoid clicks
    pub fade_ms: u32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 700,
            sample_rate: 44100,
            volume: 0.5,
            fade_ms: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PhrasebookConfig {
    /// Jaro-Winkler similarity needed for an approximate match (exact only when unset)
    pub fuzzy_threshold: Option<f64>,
    /// Returned when no phrase matches
    pub fallback: String,
    /// Extra phrases, merged over the built-in table
    pub entries: HashMap<String, String>,
}

impl Default for PhrasebookConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: None,
            fallback: crate::phrasebook::DEFAULT_FALLBACK.to_owned(),
            entries: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SpeechConfig {
    /// External synthesizer invoked as `<program> -v <voice> <text>`
    pub program: String,
    pub english_voice: String,
    pub urdu_voice: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: "espeak-ng".to_owned(),
            english_voice: "en".to_owned(),
            urdu_voice: "ur".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub log_path: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: "~/.morse-beacon/morse-beacon.log".to_owned(),
        }
    }
}

const DEFAULT_CONFIG: &str = r#"[timing]
unit_ms = 100

[tone]
frequency_hz = 700
sample_rate = 44100
volume = 0.5
fade_ms = 5

[phrasebook]
fallback = "🔍 ترجمہ دستیاب نہیں"

[phrasebook.entries]

[speech]
program = "espeak-ng"
english_voice = "en"
urdu_voice = "ur"

[telemetry]
enabled = false
log_path = "~/.morse-beacon/morse-beacon.log"
"#;

impl Config {
    /// Load config from ~/.morse-beacon.toml, writing defaults if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default(&config_path).context("failed to create default config")?;
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_toml_str(&contents)
    }

    /// Parse and validate config TOML
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config TOML")?;
        config.validate().context("invalid config")?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.unit_ms == 0 {
            return Err(ConfigError::ZeroUnit);
        }
        if self.timing.unit_ms > MAX_UNIT_MS {
            return Err(ConfigError::UnitTooLong(self.timing.unit_ms));
        }
        if self.timing.wpm == Some(0) {
            return Err(ConfigError::ZeroWpm);
        }
        if self.tone.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        let nyquist = self.tone.sample_rate / 2;
        if self.tone.frequency_hz == 0 || self.tone.frequency_hz > nyquist {
            return Err(ConfigError::Frequency {
                frequency: self.tone.frequency_hz,
                nyquist,
            });
        }
        if !(0.0..=1.0).contains(&self.tone.volume) {
            return Err(ConfigError::Volume(self.tone.volume));
        }
        if let Some(threshold) = self.phrasebook.fuzzy_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::Threshold(threshold));
            }
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".morse-beacon.toml"))
    }

    fn create_default(path: &Path) -> Result<()> {
        fs::write(path, DEFAULT_CONFIG).context("failed to write default config")?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(())
    }

    /// Expand ~ in paths to home directory
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        if let Some(stripped) = path.strip_prefix("~/") {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            Ok(PathBuf::from(home).join(stripped))
        } else {
            Ok(PathBuf::from(path))
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_matches_defaults() {
        let config = Config::from_toml_str(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();

        assert_eq!(config.timing.unit_ms, defaults.timing.unit_ms);
        assert_eq!(config.tone.frequency_hz, defaults.tone.frequency_hz);
        assert_eq!(config.tone.sample_rate, defaults.tone.sample_rate);
        assert_eq!(config.tone.volume, defaults.tone.volume);
        assert_eq!(config.tone.fade_ms, defaults.tone.fade_ms);
        assert_eq!(config.phrasebook.fallback, defaults.phrasebook.fallback);
        assert_eq!(config.speech.program, defaults.speech.program);
        assert_eq!(config.telemetry.enabled, defaults.telemetry.enabled);
        assert_eq!(config.telemetry.log_path, defaults.telemetry.log_path);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.timing.unit(), Duration::from_millis(100));
        assert_eq!(config.tone.frequency_hz, 700);
        assert!(config.phrasebook.entries.is_empty());
    }

    #[test]
    fn test_partial_section() {
        let config = Config::from_toml_str("[tone]\nfrequency_hz = 600\n").unwrap();
        assert_eq!(config.tone.frequency_hz, 600);
        assert_eq!(config.tone.sample_rate, 44100);
    }

    #[test]
    fn test_wpm_overrides_unit() {
        let config = Config::from_toml_str("[timing]\nunit_ms = 250\nwpm = 20\n").unwrap();
        assert_eq!(config.timing.unit(), Duration::from_millis(60));
    }

    #[test]
    fn test_phrasebook_entries() {
        let config =
            Config::from_toml_str("[phrasebook.entries]\n\"THANK YOU\" = \"شکریہ\"\n").unwrap();
        assert_eq!(
            config.phrasebook.entries.get("THANK YOU").map(String::as_str),
            Some("شکریہ")
        );
    }

    #[test]
    fn test_validate_rejects_zero_unit() {
        let mut config = Config::default();
        config.timing.unit_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroUnit));
        assert!(Config::from_toml_str("[timing]\nunit_ms = 0\n").is_err());
    }

    #[test]
    fn test_validate_rejects_huge_unit() {
        let mut config = Config::default();
        config.timing.unit_ms = MAX_UNIT_MS;
        assert_eq!(config.validate(), Ok(()));

        config.timing.unit_ms = 1_000_000_000_000_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnitTooLong(1_000_000_000_000_000))
        );
        assert!(Config::from_toml_str("[timing]\nunit_ms = 1000000000000000\n").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_wpm() {
        let mut config = Config::default();
        config.timing.wpm = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroWpm));
    }

    #[test]
    fn test_validate_rejects_frequency_above_nyquist() {
        let mut config = Config::default();
        config.tone.sample_rate = 8000;
        config.tone.frequency_hz = 5000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Frequency {
                frequency: 5000,
                nyquist: 4000
            })
        );
    }

    #[test]
    fn test_validate_rejects_volume() {
        let mut config = Config::default();
        config.tone.volume = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::Volume(1.5)));
    }

    #[test]
    fn test_validate_rejects_threshold() {
        let mut config = Config::default();
        config.phrasebook.fuzzy_threshold = Some(-0.1);
        assert_eq!(config.validate(), Err(ConfigError::Threshold(-0.1)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("morse-beacon-missing.toml");
        let _ = fs::remove_file(&path);
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("morse-beacon-load-test.toml");
        fs::write(&path, "[timing]\nunit_ms = 80\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timing.unit(), Duration::from_millis(80));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_expand_path() {
        let home = std::env::var("HOME").expect("HOME not set");
        assert_eq!(
            Config::expand_path("~/a/b.log").unwrap(),
            PathBuf::from(home).join("a/b.log")
        );
        assert_eq!(
            Config::expand_path("/tmp/x").unwrap(),
            PathBuf::from("/tmp/x")
        );
        assert_eq!(
            Config::expand_path("logs/morse.log").unwrap(),
            PathBuf::from("logs/morse.log")
        );
    }

    #[test]
    fn test_default_log_path_expands_under_home() {
        let home = std::env::var("HOME").expect("HOME not set");
        let path = Config::expand_path(&TelemetryConfig::default().log_path).unwrap();
        assert_eq!(path, PathBuf::from(home).join(".morse-beacon/morse-beacon.log"));
    }
}
