//! Waveform normalization and time/pixel mapping for audio recordings.
//!
//! [`waveform`] turns raw per-frame gains into bounded pixel heights and
//! [`timeline`] converts between playback time and horizontal pixel offset.
//! [`publish`] hands finished results to render-side readers as immutable
//! snapshots.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod numeric;
pub mod publish;
pub mod timeline;
pub mod waveform;

pub use config::{RecwaveConfig, TimelineConfig, WaveformConfig};
pub use error::WaveformError;
pub use publish::{SnapshotPublisher, SnapshotReader, WaveformSnapshot};
pub use timeline::{PlaybackPosition, TimeScale};
