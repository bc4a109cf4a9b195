//! Amplitude normalization.
//!
//! Turns raw per-frame gains into a bounded height profile: a 3-point moving
//! average, a clamp into the 8-bit histogram domain, percentile clipping of the
//! extreme tails, a contrast stretch, and a quadratic response.

use crate::error::{Result, WaveformError};
use crate::numeric::{clamp_unit, round_to_i32};

/// Number of histogram buckets; scaled gains live in `[0, HISTOGRAM_BINS - 1]`.
pub const HISTOGRAM_BINS: usize = 256;

const MAX_BIN: f64 = (HISTOGRAM_BINS - 1) as f64;

/// Fraction of frames discarded from the quiet end (1/20 = 5%).
const FLOOR_DIVISOR: usize = 20;

/// Fraction of frames discarded from the loud end (1/100 = 1%).
const CEILING_DIVISOR: usize = 100;

/// Intermediate values of a normalization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeStats {
    /// Factor applied to smoothed gains before quantizing
    pub scale_factor: f64,
    /// 5th percentile bin
    pub min_gain: f64,
    /// 99th percentile bin
    pub max_gain: f64,
    /// Contrast-stretch divisor, never below 1
    pub range: f64,
}

/// Normalizes raw gains to pixel half-heights in `[0, half_height_px]`.
///
/// # Errors
/// - If any gain is negative
/// - If `half_height_px` is negative
pub fn normalize(raw: &[i32], half_height_px: i32) -> Result<Vec<i32>> {
    normalize_with_stats(raw, half_height_px).map(|(heights, _)| heights)
}

/// Like [`normalize`], also returning the pass statistics.
///
/// Stats are `None` for an empty series.
///
/// # Errors
/// - If any gain is negative
/// - If `half_height_px` is negative
pub fn normalize_with_stats(
    raw: &[i32],
    half_height_px: i32,
) -> Result<(Vec<i32>, Option<NormalizeStats>)> {
    check_half_height(half_height_px)?;
    let (unit, stats) = unit_profile(raw)?;
    Ok((scale_heights(&unit, half_height_px), stats))
}

/// Computes the `[0, 1]` height profile without pixel scaling.
///
/// A renderer that only changed size can rescale this with [`scale_heights`]
/// instead of running the whole pass again.
///
/// # Errors
/// - If any gain is negative
pub fn normalize_unit(raw: &[i32]) -> Result<Vec<f64>> {
    unit_profile(raw).map(|(unit, _)| unit)
}

/// Maps unit heights onto `[0, half_height_px]`.
pub fn scale_heights(unit: &[f64], half_height_px: i32) -> Vec<i32> {
    let half = f64::from(half_height_px.max(0));
    unit.iter()
        .map(|&h| round_to_i32(clamp_unit(h) * half))
        .collect()
}

fn check_half_height(half_height_px: i32) -> Result<()> {
    if half_height_px < 0 {
        return Err(WaveformError::invalid(format!(
            "half_height_px must be non-negative, got {half_height_px}"
        )));
    }
    Ok(())
}

fn check_gains(raw: &[i32]) -> Result<()> {
    match raw.iter().position(|&g| g < 0) {
        Some(index) => Err(WaveformError::invalid(format!(
            "gain at frame {index} is negative ({})",
            raw[index]
        ))),
        None => Ok(()),
    }
}

fn unit_profile(raw: &[i32]) -> Result<(Vec<f64>, Option<NormalizeStats>)> {
    check_gains(raw)?;
    if raw.is_empty() {
        return Ok((Vec::new(), None));
    }

    let smoothed = smooth(raw);

    let peak = smoothed.iter().copied().fold(1.0_f64, f64::max);
    let scale_factor = if peak > MAX_BIN { MAX_BIN / peak } else { 1.0 };
    let scaled: Vec<f64> = smoothed.iter().map(|&g| g * scale_factor).collect();

    let histogram = GainHistogram::from_scaled(&scaled);
    let min_gain = histogram.floor_bin(raw.len() / FLOOR_DIVISOR) as f64;
    let max_gain = histogram.ceiling_bin(raw.len() / CEILING_DIVISOR) as f64;
    let range = (max_gain - min_gain).max(1.0);

    let unit = scaled
        .iter()
        .map(|&g| {
            let value = clamp_unit((g - min_gain) / range);
            value * value
        })
        .collect();

    let stats = NormalizeStats {
        scale_factor,
        min_gain,
        max_gain,
        range,
    };
    tracing::trace!(frames = raw.len(), ?stats, "Normalized waveform");
    Ok((unit, Some(stats)))
}

/// Moving average with boundary truncation.
///
/// Interior points average `{i-1, i, i+1}`; the two endpoints average
/// themselves with their single neighbour. Series shorter than three frames are
/// returned unchanged.
pub fn smooth(raw: &[i32]) -> Vec<f64> {
    let gains: Vec<f64> = raw.iter().map(|&g| f64::from(g)).collect();
    let n = gains.len();
    if n < 3 {
        return gains;
    }

    let mut smoothed = Vec::with_capacity(n);
    smoothed.push((gains[0] + gains[1]) / 2.0);
    for window in gains.windows(3) {
        smoothed.push((window[0] + window[1] + window[2]) / 3.0);
    }
    smoothed.push((gains[n - 2] + gains[n - 1]) / 2.0);
    smoothed
}

/// Frequency histogram of scaled gains over 256 integer bins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GainHistogram {
    counts: [usize; HISTOGRAM_BINS],
    highest: Option<usize>,
}

impl GainHistogram {
    /// Builds the histogram; each value is truncated and clamped into a bin.
    pub fn from_scaled(scaled: &[f64]) -> Self {
        let mut counts = [0usize; HISTOGRAM_BINS];
        let mut highest = None;
        for &value in scaled {
            let bin = value.clamp(0.0, MAX_BIN) as usize;
            counts[bin] += 1;
            highest = highest.max(Some(bin));
        }
        Self { counts, highest }
    }

    pub fn count(&self, bin: usize) -> usize {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    /// Highest occupied bin, `None` when empty.
    pub fn highest_bin(&self) -> Option<usize> {
        self.highest
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// First bin, walking up from 0, at which the running count reaches
    /// `threshold`. A zero threshold is met at bin 0.
    pub fn floor_bin(&self, threshold: usize) -> usize {
        let mut sum = 0;
        for (bin, &count) in self.counts.iter().enumerate() {
            sum += count;
            if sum >= threshold {
                return bin;
            }
        }
        HISTOGRAM_BINS - 1
    }

    /// First bin, walking down from the highest occupied bin, at which the
    /// running count reaches `threshold`. A zero threshold is met at the
    /// highest occupied bin.
    pub fn ceiling_bin(&self, threshold: usize) -> usize {
        let Some(top) = self.highest else {
            return 0;
        };
        let mut sum = 0;
        for bin in (0..=top).rev() {
            sum += self.counts[bin];
            if sum >= threshold {
                return bin;
            }
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bounded(heights: &[i32], half: i32) {
        for &h in heights {
            assert!((0..=half).contains(&h), "height {h} outside [0, {half}]");
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(&[], 100).unwrap(), Vec::<i32>::new());
        let (heights, stats) = normalize_with_stats(&[], 100).unwrap();
        assert!(heights.is_empty());
        assert!(stats.is_none());
    }

    #[test]
    fn test_singleton_is_deterministic() {
        let first = normalize(&[5], 100).unwrap();
        let second = normalize(&[5], 100).unwrap();
        assert_eq!(first.len(), 1);
        assert_bounded(&first, 100);
        assert_eq!(first, second);
    }

    #[test]
    fn test_peak_scenario() {
        let raw = [0, 0, 0, 10, 20, 10, 0, 0, 0];
        let heights = normalize(&raw, 100).unwrap();

        assert_eq!(heights.len(), 9);
        assert_bounded(&heights, 100);

        let peak = *heights.iter().max().unwrap();
        assert_eq!(heights[4], peak);
        assert_eq!(heights[4], 100);
        // Smoothing spreads the peak into indices 2 and 6; "silence maps to 0"
        // holds only where the whole 3-frame window is silent.
        assert!(heights[2] > 0 && heights[6] > 0);
        assert_eq!(&heights[..2], &[0, 0]);
        assert_eq!(&heights[7..], &[0, 0]);
    }

    #[test]
    fn test_all_equal_is_flat() {
        let heights = normalize(&[10, 10, 10, 10, 10], 100).unwrap();
        assert_eq!(heights.len(), 5);
        assert!(heights.windows(2).all(|w| w[0] == w[1]));

        // Enough frames that the 5th percentile floor lands on the plateau.
        let heights = normalize(&[42; 40], 80).unwrap();
        assert!(heights.iter().all(|&h| h == 0));
    }

    #[test]
    fn test_all_zero_is_zero() {
        let heights = normalize(&[0; 300], 100).unwrap();
        assert_eq!(heights.len(), 300);
        assert!(heights.iter().all(|&h| h == 0));
    }

    #[test]
    fn test_bounds_for_varied_input() {
        let raw: Vec<i32> = (0..500).map(|i| (i * 7919) % 1000).collect();
        for half in [0, 1, 37, 100, 512] {
            let heights = normalize(&raw, half).unwrap();
            assert_eq!(heights.len(), raw.len());
            assert_bounded(&heights, half);
        }
    }

    #[test]
    fn test_large_gains_are_prescaled() {
        let raw = [0, 1000, 2000, 1000, 0];
        let (heights, stats) = normalize_with_stats(&raw, 50).unwrap();
        let stats = stats.unwrap();
        assert!(stats.scale_factor < 1.0);
        assert!((stats.scale_factor - 255.0 / (4000.0 / 3.0)).abs() < 1e-9);
        assert!(stats.max_gain >= 254.0);
        assert_eq!(heights[2], 50);
        assert_bounded(&heights, 50);
    }

    #[test]
    fn test_small_gains_are_not_scaled() {
        let (_, stats) = normalize_with_stats(&[1, 2, 3], 10).unwrap();
        assert_eq!(stats.unwrap().scale_factor, 1.0);
    }

    #[test]
    fn test_outliers_are_clipped() {
        // Two plateaus with a single loud spike. The 1% ceiling skips the
        // spike, so the loud plateau is stretched to full height.
        let mut raw = vec![20; 200];
        raw.extend(vec![60; 200]);
        raw[300] = 600;

        let (heights, stats) = normalize_with_stats(&raw, 100).unwrap();
        let stats = stats.unwrap();
        assert_eq!(stats.min_gain, 20.0);
        assert_eq!(stats.max_gain, 60.0);
        assert_eq!(heights[50], 0);
        assert_eq!(heights[350], 100);
        assert_eq!(heights[300], 100);
    }

    #[test]
    fn test_rejects_negative_input() {
        let err = normalize(&[1, -2, 3], 100).unwrap_err();
        assert!(matches!(err, WaveformError::InvalidArgument(_)));
        assert!(err.to_string().contains("frame 1"));

        assert!(matches!(
            normalize(&[1, 2, 3], -1),
            Err(WaveformError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_smooth_edges() {
        assert!(smooth(&[]).is_empty());
        assert_eq!(smooth(&[7]), vec![7.0]);
        assert_eq!(smooth(&[3, 9]), vec![3.0, 9.0]);
        assert_eq!(smooth(&[0, 6, 3]), vec![3.0, 3.0, 4.5]);
        assert_eq!(smooth(&[3, 3, 3, 3]), vec![3.0; 4]);
    }

    #[test]
    fn test_histogram_percentiles() {
        let scaled: Vec<f64> = (0..100).map(f64::from).collect();
        let histogram = GainHistogram::from_scaled(&scaled);
        assert_eq!(histogram.total(), 100);
        assert_eq!(histogram.highest_bin(), Some(99));
        assert_eq!(histogram.floor_bin(5), 4);
        assert_eq!(histogram.ceiling_bin(1), 99);
        assert_eq!(histogram.ceiling_bin(3), 97);
        assert_eq!(histogram.floor_bin(0), 0);
    }

    #[test]
    fn test_histogram_clamps_bins() {
        let histogram = GainHistogram::from_scaled(&[-3.0, 12.9, 400.0]);
        assert_eq!(histogram.count(0), 1);
        assert_eq!(histogram.count(12), 1);
        assert_eq!(histogram.count(255), 1);
        assert_eq!(histogram.count(999), 0);
    }

    #[test]
    fn test_unit_profile_rescales() {
        let raw = [0, 0, 0, 10, 20, 10, 0, 0, 0];
        let unit = normalize_unit(&raw).unwrap();
        assert!(unit.iter().all(|&h| (0.0..=1.0).contains(&h)));
        assert_eq!(scale_heights(&unit, 100), normalize(&raw, 100).unwrap());
        assert_eq!(scale_heights(&unit, 40), normalize(&raw, 40).unwrap());
    }
}
