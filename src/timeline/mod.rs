//! Time/pixel mapping.
//!
//! The single source of truth for placing time on the horizontal axis. Grid
//! drawing, progress rendering and seek handling all go through the same
//! [`TimeScale`], so they stay visually in step.

pub mod grid;
pub mod position;
pub mod scale;

pub use grid::{format_mm_ss, grid_marks, grid_step_for_density, seconds_grid_marks, GridMark};
pub use position::PlaybackPosition;
pub use scale::{compute_density, pixel_to_time, time_to_pixel, TimeScale};
