//! Configuration file management for recwave.
//!
//! This module handles loading and saving configuration from TOML files.
//! Configuration is stored in the user's config directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WaveformError};
use crate::numeric::is_positive_finite;

/// Time/pixel mapping configuration.
///
/// Supplied to the mapper by value; there is no process-wide instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Recordings longer than this (seconds) are compressed into `visual_budget_px`
    #[serde(default = "default_long_record_threshold_secs")]
    pub long_record_threshold_secs: f64,
    /// Fixed density for recordings at or under the threshold
    #[serde(default = "default_short_record_px_per_sec")]
    pub short_record_px_per_sec: f64,
    /// Horizontal pixel budget a long recording is fitted into
    #[serde(default = "default_visual_budget_px")]
    pub visual_budget_px: f64,
    /// Minimum distance between labelled grid marks
    #[serde(default = "default_min_grid_spacing_px")]
    pub min_grid_spacing_px: f64,
}

fn default_long_record_threshold_secs() -> f64 {
    25.0
}

fn default_short_record_px_per_sec() -> f64 {
    25.0
}

fn default_visual_budget_px() -> f64 {
    1500.0
}

fn default_min_grid_spacing_px() -> f64 {
    40.0
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            long_record_threshold_secs: default_long_record_threshold_secs(),
            short_record_px_per_sec: default_short_record_px_per_sec(),
            visual_budget_px: default_visual_budget_px(),
            min_grid_spacing_px: default_min_grid_spacing_px(),
        }
    }
}

impl TimelineConfig {
    /// Rejects values the mapper cannot work with.
    ///
    /// # Errors
    /// - If the short-record rate or threshold is not a positive finite number
    /// - If the visual budget or grid spacing is negative or non-finite
    pub fn validate(&self) -> Result<()> {
        if !is_positive_finite(self.short_record_px_per_sec) {
            return Err(WaveformError::invalid(format!(
                "short_record_px_per_sec must be positive, got {}",
                self.short_record_px_per_sec
            )));
        }
        if !is_positive_finite(self.long_record_threshold_secs) {
            return Err(WaveformError::invalid(format!(
                "long_record_threshold_secs must be positive, got {}",
                self.long_record_threshold_secs
            )));
        }
        if !self.visual_budget_px.is_finite() || self.visual_budget_px < 0.0 {
            return Err(WaveformError::invalid(format!(
                "visual_budget_px must be non-negative, got {}",
                self.visual_budget_px
            )));
        }
        if !self.min_grid_spacing_px.is_finite() || self.min_grid_spacing_px < 0.0 {
            return Err(WaveformError::invalid(format!(
                "min_grid_spacing_px must be non-negative, got {}",
                self.min_grid_spacing_px
            )));
        }
        Ok(())
    }
}

/// Waveform rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveformConfig {
    /// Half of the drawing surface height, in pixels
    #[serde(default = "default_half_height_px")]
    pub half_height_px: i32,
    /// Samples per frame when deriving gains from PCM
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
}

fn default_half_height_px() -> i32 {
    100
}

fn default_frame_size() -> usize {
    crate::waveform::frames::FRAME_SIZE
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            half_height_px: default_half_height_px(),
            frame_size: default_frame_size(),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecwaveConfig {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub waveform: WaveformConfig,
}

impl RecwaveConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed or holds invalid values
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed or holds invalid values
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// - If the TOML is malformed
    /// - If a value fails validation
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: RecwaveConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to pretty TOML.
    ///
    /// # Errors
    /// - If serialization fails
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = get_config_path()?;
        self.save_to(&config_path)
    }

    /// Saves configuration to an explicit path.
    ///
    /// # Errors
    /// - If the file cannot be written
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        fs::write(path, self.to_toml_string()?)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Validates every section.
    ///
    /// # Errors
    /// - If any timeline value is out of range
    /// - If the half-height is negative or the frame size is zero
    pub fn validate(&self) -> Result<()> {
        self.timeline.validate()?;
        if self.waveform.half_height_px < 0 {
            return Err(WaveformError::invalid(format!(
                "half_height_px must be non-negative, got {}",
                self.waveform.half_height_px
            )));
        }
        if self.waveform.frame_size == 0 {
            return Err(WaveformError::invalid("frame_size must be at least 1"));
        }
        Ok(())
    }
}

/// Retrieves the path to the config file, creating its directory.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> std::result::Result<PathBuf, std::io::Error> {
    let home = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not find home directory",
        )
    })?;
    let config_dir = home.join(".config").join("recwave");
    fs::create_dir_all(&config_dir)?;

    Ok(config_dir.join("recwave.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RecwaveConfig::from_toml_str("").unwrap();
        assert_eq!(config, RecwaveConfig::default());
        assert_eq!(config.timeline.long_record_threshold_secs, 25.0);
        assert_eq!(config.waveform.half_height_px, 100);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = RecwaveConfig::from_toml_str(
            "[timeline]\nvisual_budget_px = 900.0\n",
        )
        .unwrap();
        assert_eq!(config.timeline.visual_budget_px, 900.0);
        assert_eq!(config.timeline.short_record_px_per_sec, 25.0);
        assert_eq!(config.waveform, WaveformConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let err = RecwaveConfig::from_toml_str("[timeline]\nshort_record_px_per_sec = 0.0\n")
            .unwrap_err();
        assert!(err.to_string().contains("short_record_px_per_sec"));
    }

    #[test]
    fn test_rejects_negative_budget_and_half_height() {
        assert!(RecwaveConfig::from_toml_str("[timeline]\nvisual_budget_px = -1.0\n").is_err());
        assert!(RecwaveConfig::from_toml_str("[waveform]\nhalf_height_px = -5\n").is_err());
        assert!(RecwaveConfig::from_toml_str("[waveform]\nframe_size = 0\n").is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recwave.toml");

        let mut config = RecwaveConfig::default();
        config.timeline.long_record_threshold_secs = 30.0;
        config.waveform.half_height_px = 64;
        config.save_to(&path).unwrap();

        let reloaded = RecwaveConfig::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }
}
