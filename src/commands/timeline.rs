//! Density, grid and playback position queries.

use anyhow::bail;

use crate::config::RecwaveConfig;
use crate::timeline::{GridMark, PlaybackPosition, TimeScale};

/// Where a position query starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    /// A playback progress tick, in milliseconds
    Time(u64),
    /// A seek gesture, in pixels
    Pixel(u32),
}

fn build_scale(duration: f64, budget: Option<f64>, config: &RecwaveConfig) -> anyhow::Result<TimeScale> {
    let budget = budget.unwrap_or(config.timeline.visual_budget_px);
    if !budget.is_finite() || budget < 0.0 {
        bail!("visual budget must be a non-negative number of pixels, got {budget}");
    }
    Ok(TimeScale::with_budget(duration, budget, &config.timeline))
}

/// Prints the density for a record of `duration` seconds.
///
/// # Errors
/// - If the budget is negative or not finite
pub fn handle_density(duration: f64, budget: Option<f64>, config: &RecwaveConfig) -> anyhow::Result<()> {
    let scale = build_scale(duration, budget, config)?;
    println!("{}", scale.density());
    Ok(())
}

/// Prints `pixel label` rows for the grid across `width` pixels.
///
/// Without an explicit step, one is picked from the configured minimum
/// spacing.
///
/// # Errors
/// - If the budget is negative or not finite
pub fn handle_grid(
    duration: f64,
    width: Option<u32>,
    step: Option<u64>,
    config: &RecwaveConfig,
) -> anyhow::Result<()> {
    let scale = build_scale(duration, None, config)?;
    let width = width.unwrap_or_else(|| scale.total_width_px());
    let marks = match step {
        Some(step) => scale.grid_marks(width, step),
        None => scale.readable_grid_marks(width, config.timeline.min_grid_spacing_px),
    };
    tracing::debug!("{} grid marks across {}px", marks.len(), width);

    for line in grid_lines(&marks) {
        println!("{line}");
    }
    Ok(())
}

fn grid_lines(marks: &[GridMark]) -> Vec<String> {
    marks
        .iter()
        .map(|mark| format!("{} {}", mark.pixel_offset, mark.label))
        .collect()
}

/// Prints the consistent time/pixel pair for a progress tick or seek.
///
/// # Errors
/// - If the budget is negative or not finite
pub fn handle_position(
    duration: f64,
    source: PositionSource,
    config: &RecwaveConfig,
) -> anyhow::Result<()> {
    let scale = build_scale(duration, None, config)?;
    let position = resolve_position(source, &scale);
    println!(
        "time_ms {} pixel {} fraction {:.4}",
        position.time_millis(),
        position.pixel_offset(),
        position.fraction(&scale)
    );
    Ok(())
}

fn resolve_position(source: PositionSource, scale: &TimeScale) -> PlaybackPosition {
    match source {
        PositionSource::Time(millis) => PlaybackPosition::from_time(millis, scale),
        PositionSource::Pixel(pixel) => PlaybackPosition::from_pixel(pixel, scale),
    }
}
