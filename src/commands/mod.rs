//! Command handlers for recwave.
//!
//! # Commands
//! - `normalize`: Turn a gain series (WAV or text) into pixel heights
//! - `frames`: Extract per-frame gains from a WAV file
//! - `density`, `grid`, `position`: Time/pixel mapping queries
//! - `config`: Show or initialize the configuration file
//! - `logs`: Display recent log entries

pub mod config;
pub mod frames;
pub mod logs;
pub mod normalize;
pub mod timeline;

pub use config::handle_config;
pub use frames::handle_frames;
pub use logs::handle_logs;
pub use normalize::handle_normalize;
pub use timeline::{handle_density, handle_grid, handle_position, PositionSource};
