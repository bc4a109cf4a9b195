//! Configuration management for recwave.
//!
//! Loads the timeline and waveform settings from a TOML file in the user's
//! config directory. The loaded values are passed explicitly into the mapper
//! and the normalizer; nothing reads them from global state.

pub mod file;

pub use file::{get_config_path, RecwaveConfig, TimelineConfig, WaveformConfig};
