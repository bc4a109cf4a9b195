//! Density computation and time/pixel conversion.

use crate::config::TimelineConfig;
use crate::numeric::{is_positive_finite, round_to_u32, round_to_u64};

/// Pixels per second for a record of `duration_secs`.
///
/// Records longer than the configured threshold are compressed into
/// `visual_budget_px`; everything else, including zero, negative and
/// non-finite durations, is drawn at the fixed short-record rate. The result
/// is always finite and positive.
pub fn compute_density(duration_secs: f64, visual_budget_px: f64, config: &TimelineConfig) -> f64 {
    let fallback = short_record_rate(config);
    if !is_positive_finite(duration_secs) || duration_secs <= config.long_record_threshold_secs {
        return fallback;
    }

    let density = visual_budget_px / duration_secs;
    if is_positive_finite(density) {
        density
    } else {
        tracing::debug!(
            "Visual budget {} unusable for {:.2}s, using {} px/s",
            visual_budget_px,
            duration_secs,
            fallback
        );
        fallback
    }
}

fn short_record_rate(config: &TimelineConfig) -> f64 {
    if is_positive_finite(config.short_record_px_per_sec) {
        config.short_record_px_per_sec
    } else {
        TimelineConfig::default().short_record_px_per_sec
    }
}

/// `round(time_millis / 1000 * density)`.
pub fn time_to_pixel(time_millis: u64, density: f64) -> u32 {
    round_to_u32(time_millis as f64 / 1000.0 * density)
}

/// `round(pixel_offset / density * 1000)`. A non-positive density maps
/// everything to 0.
pub fn pixel_to_time(pixel_offset: u32, density: f64) -> u64 {
    if !is_positive_finite(density) {
        return 0;
    }
    round_to_u64(f64::from(pixel_offset) / density * 1000.0)
}

/// Duration and the density derived from it.
///
/// Rebuilt, never mutated, when the duration changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    duration_secs: f64,
    density_px_per_sec: f64,
}

impl TimeScale {
    /// Builds the scale for a record, fitting long records into the
    /// configured visual budget.
    pub fn new(duration_secs: f64, config: &TimelineConfig) -> Self {
        Self::with_budget(duration_secs, config.visual_budget_px, config)
    }

    /// Builds the scale against an explicit pixel budget, such as the current
    /// drawing surface width.
    pub fn with_budget(duration_secs: f64, visual_budget_px: f64, config: &TimelineConfig) -> Self {
        let duration_secs = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };
        let density_px_per_sec = compute_density(duration_secs, visual_budget_px, config);
        tracing::debug!(
            "Time scale for {:.2}s: {:.3} px/s",
            duration_secs,
            density_px_per_sec
        );
        Self {
            duration_secs,
            density_px_per_sec,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn duration_millis(&self) -> u64 {
        round_to_u64(self.duration_secs * 1000.0)
    }

    pub fn density(&self) -> f64 {
        self.density_px_per_sec
    }

    /// Width of the whole record in pixels.
    pub fn total_width_px(&self) -> u32 {
        self.time_to_pixel(self.duration_millis())
    }

    pub fn time_to_pixel(&self, time_millis: u64) -> u32 {
        time_to_pixel(time_millis, self.density_px_per_sec)
    }

    pub fn pixel_to_time(&self, pixel_offset: u32) -> u64 {
        pixel_to_time(pixel_offset, self.density_px_per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TimelineConfig {
        TimelineConfig::default()
    }

    #[test]
    fn test_long_record_scenario() {
        let density = compute_density(600.0, 1500.0, &config());
        assert_eq!(density, 2.5);
        assert_eq!(time_to_pixel(60_000, density), 150);
        assert_eq!(pixel_to_time(150, density), 60_000);
    }

    #[test]
    fn test_short_record_uses_fixed_rate() {
        let cfg = config();
        for duration in [0.5, 1.0, 10.0, 24.9, 25.0] {
            assert_eq!(compute_density(duration, 1500.0, &cfg), cfg.short_record_px_per_sec);
        }
    }

    #[test]
    fn test_density_decreases_past_threshold() {
        let cfg = config();
        let mut previous = f64::INFINITY;
        for duration in [26.0, 30.0, 60.0, 600.0, 3600.0, 36_000.0] {
            let density = compute_density(duration, 1500.0, &cfg);
            assert!(density < previous, "{density} at {duration}s not below {previous}");
            assert!(density > 0.0);
            previous = density;
        }
    }

    #[test]
    fn test_degenerate_durations_fall_back() {
        let cfg = config();
        for duration in [0.0, -5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(compute_density(duration, 1500.0, &cfg), cfg.short_record_px_per_sec);
        }
    }

    #[test]
    fn test_degenerate_budget_falls_back() {
        let cfg = config();
        assert_eq!(compute_density(600.0, 0.0, &cfg), cfg.short_record_px_per_sec);
        assert_eq!(compute_density(600.0, -10.0, &cfg), cfg.short_record_px_per_sec);
        assert_eq!(compute_density(600.0, f64::NAN, &cfg), cfg.short_record_px_per_sec);
    }

    #[test]
    fn test_time_to_pixel_is_monotonic() {
        let density = 2.5;
        let mut previous = 0;
        for t in (0..10_000).step_by(37) {
            let px = time_to_pixel(t, density);
            assert!(px >= previous);
            previous = px;
        }
    }

    #[test]
    fn test_round_trip_within_rounding() {
        for density in [0.1, 1.0, 2.5, 25.0, 333.3, 1000.0] {
            for t in (0..120_000u64).step_by(997) {
                let back = pixel_to_time(time_to_pixel(t, density), density);
                let tolerance = 500.0 / density + 1.0;
                assert!(
                    (back as f64 - t as f64).abs() <= tolerance,
                    "t={t} back={back} density={density}"
                );
            }
            for px in 0..2000u32 {
                assert_eq!(time_to_pixel(pixel_to_time(px, density), density), px);
            }
        }
    }

    #[test]
    fn test_pixel_to_time_guards_density() {
        assert_eq!(pixel_to_time(100, 0.0), 0);
        assert_eq!(pixel_to_time(100, -1.0), 0);
    }

    #[test]
    fn test_time_scale() {
        let cfg = config();
        let scale = TimeScale::new(600.0, &cfg);
        assert_eq!(scale.density(), 2.5);
        assert_eq!(scale.duration_millis(), 600_000);
        assert_eq!(scale.total_width_px(), 1500);
        assert_eq!(scale.time_to_pixel(60_000), 150);
        assert_eq!(scale.pixel_to_time(150), 60_000);

        let short = TimeScale::new(10.0, &cfg);
        assert_eq!(short.density(), 25.0);
        assert_eq!(short.total_width_px(), 250);

        let narrow = TimeScale::with_budget(600.0, 600.0, &cfg);
        assert_eq!(narrow.density(), 1.0);

        let empty = TimeScale::new(-3.0, &cfg);
        assert_eq!(empty.duration_secs(), 0.0);
        assert_eq!(empty.density(), 25.0);
        assert_eq!(empty.total_width_px(), 0);
    }
}
