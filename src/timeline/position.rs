//! Playback position kept consistent in both time and pixel form.

use super::scale::TimeScale;

/// A playback position under a given [`TimeScale`].
///
/// Either representation can be the source; the other is always derived
/// through the scale, and both are clamped to the record's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackPosition {
    time_millis: u64,
    pixel_offset: u32,
}

impl PlaybackPosition {
    /// Position at the start of the record.
    pub fn start() -> Self {
        Self {
            time_millis: 0,
            pixel_offset: 0,
        }
    }

    /// From a progress tick reporting elapsed playback time.
    pub fn from_time(time_millis: u64, scale: &TimeScale) -> Self {
        let time_millis = time_millis.min(scale.duration_millis());
        Self {
            time_millis,
            pixel_offset: scale.time_to_pixel(time_millis),
        }
    }

    /// From a seek gesture landing at `pixel_offset`.
    pub fn from_pixel(pixel_offset: u32, scale: &TimeScale) -> Self {
        let time_millis = scale.pixel_to_time(pixel_offset);
        Self::from_time(time_millis, scale)
    }

    /// Moves forward by `delta_millis`, stopping at the end of the record.
    pub fn advance(&self, delta_millis: u64, scale: &TimeScale) -> Self {
        Self::from_time(self.time_millis.saturating_add(delta_millis), scale)
    }

    /// Re-derives the pixel offset after the scale was replaced.
    pub fn rescale(&self, scale: &TimeScale) -> Self {
        Self::from_time(self.time_millis, scale)
    }

    pub fn time_millis(&self) -> u64 {
        self.time_millis
    }

    pub fn pixel_offset(&self) -> u32 {
        self.pixel_offset
    }

    /// Share of the record already played, in `[0, 1]`.
    pub fn fraction(&self, scale: &TimeScale) -> f64 {
        let total = scale.duration_millis();
        if total == 0 {
            return 0.0;
        }
        (self.time_millis as f64 / total as f64).min(1.0)
    }

    pub fn is_at_end(&self, scale: &TimeScale) -> bool {
        self.time_millis >= scale.duration_millis()
    }
}

impl Default for PlaybackPosition {
    fn default() -> Self {
        Self::start()
    }
}
