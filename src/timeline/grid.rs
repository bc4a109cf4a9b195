//! Grid mark placement and labels.

use super::scale::{time_to_pixel, TimeScale};
use crate::numeric::is_positive_finite;

/// Candidate spacings between labelled marks, in seconds.
const GRID_STEPS_SECS: [u64; 10] = [1, 2, 5, 10, 15, 30, 60, 120, 300, 600];

/// A vertical grid line with its time label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMark {
    pub pixel_offset: u32,
    pub seconds: u64,
    pub label: String,
}

/// Formats elapsed whole seconds as `MM:SS`. Minutes do not wrap at 60.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// One mark for every whole second whose offset falls within `[0, width_px]`.
pub fn seconds_grid_marks(width_px: u32, density: f64) -> Vec<GridMark> {
    grid_marks(width_px, density, 1)
}

/// Marks every `step_secs` seconds within `[0, width_px]`.
///
/// Yields nothing for a zero step or a non-positive density.
pub fn grid_marks(width_px: u32, density: f64, step_secs: u64) -> Vec<GridMark> {
    if step_secs == 0 || !is_positive_finite(density) {
        return Vec::new();
    }

    let mut marks = Vec::new();
    let mut seconds = 0u64;
    loop {
        let pixel_offset = time_to_pixel(seconds.saturating_mul(1000), density);
        if pixel_offset > width_px {
            break;
        }
        marks.push(GridMark {
            pixel_offset,
            seconds,
            label: format_mm_ss(seconds),
        });
        // Saturated offsets stop advancing.
        if pixel_offset == u32::MAX {
            break;
        }
        match seconds.checked_add(step_secs) {
            Some(next) => seconds = next,
            None => break,
        }
    }
    marks
}

/// Smallest step whose marks are at least `min_spacing_px` apart.
///
/// Past the listed steps this grows in whole multiples of the coarsest one,
/// so a ten-hour record still gets readable `20:00` marks.
pub fn grid_step_for_density(density: f64, min_spacing_px: f64) -> u64 {
    let coarsest = GRID_STEPS_SECS[GRID_STEPS_SECS.len() - 1];
    if let Some(step) = GRID_STEPS_SECS
        .iter()
        .copied()
        .find(|&step| step as f64 * density >= min_spacing_px)
    {
        return step;
    }
    if !is_positive_finite(density) {
        return coarsest;
    }

    let multiple = (min_spacing_px / (coarsest as f64 * density)).ceil();
    // Float to int casts saturate, NaN becomes 0.
    (multiple as u64).max(1).saturating_mul(coarsest)
}

impl TimeScale {
    /// Marks every `step_secs` seconds across `width_px`.
    pub fn grid_marks(&self, width_px: u32, step_secs: u64) -> Vec<GridMark> {
        grid_marks(width_px, self.density(), step_secs)
    }

    /// Marks at a step readable for this density.
    pub fn readable_grid_marks(&self, width_px: u32, min_spacing_px: f64) -> Vec<GridMark> {
        let step = grid_step_for_density(self.density(), min_spacing_px);
        self.grid_marks(width_px, step)
    }
}
