//! Per-frame gain extraction.
//!
//! Produces the raw amplitude series the normalizer consumes, either from
//! interleaved 16-bit PCM, a WAV file on disk, or a plain-text dump of gains.

use hound::{SampleFormat, WavReader};
use std::path::Path;

use crate::error::{Result, WaveformError};

/// Default number of samples (per channel) in one frame.
pub const FRAME_SIZE: usize = 1024;

/// Gains derived from an audio file, with the timing needed to map them.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGains {
    pub gains: Vec<i32>,
    pub sample_rate: u32,
    pub channels: usize,
    pub frame_size: usize,
    pub duration_secs: f64,
}

impl FrameGains {
    /// Duration of a single frame, in seconds.
    pub fn seconds_per_frame(&self) -> f64 {
        self.frame_size as f64 / f64::from(self.sample_rate.max(1))
    }
}

/// Computes one gain per frame of interleaved PCM.
///
/// Channels are averaged into a mono magnitude per sample; a frame's gain is
/// the square root of its loudest mono magnitude, truncated. A trailing partial
/// frame still yields a gain.
///
/// # Errors
/// - If `channels` or `frame_size` is zero
/// - If a frame of `channels * frame_size` samples does not fit in `usize`
pub fn frame_gains(samples: &[i16], channels: usize, frame_size: usize) -> Result<Vec<i32>> {
    if channels == 0 {
        return Err(WaveformError::invalid("channel count must be at least 1"));
    }
    if frame_size == 0 {
        return Err(WaveformError::invalid("frame size must be at least 1"));
    }
    let frame_len = channels.checked_mul(frame_size).ok_or_else(|| {
        WaveformError::invalid(format!(
            "frame of {frame_size} samples across {channels} channels is too large"
        ))
    })?;

    let gains = samples
        .chunks(frame_len)
        .map(|frame| {
            let loudest = frame
                .chunks(channels)
                .map(|sample| {
                    let sum: i32 = sample.iter().map(|&s| i32::from(s).abs()).sum();
                    sum / sample.len() as i32
                })
                .max()
                .unwrap_or(0);
            f64::from(loudest).sqrt() as i32
        })
        .collect();
    Ok(gains)
}

/// Reads a 16-bit PCM WAV file and extracts its frame gains.
///
/// # Errors
/// - If the file cannot be opened or decoded
/// - If the file is not 16-bit integer PCM
/// - If `frame_size` is zero
pub fn read_wav_gains(path: &Path, frame_size: usize) -> Result<FrameGains> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(WaveformError::UnsupportedFormat(format!(
            "{}: expected 16-bit integer PCM, found {}-bit {:?}",
            path.display(),
            spec.bits_per_sample,
            spec.sample_format
        )));
    }

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let channels = usize::from(spec.channels.max(1));
    let gains = frame_gains(&samples, channels, frame_size)?;

    let total_frames = samples.len() / channels;
    let duration_secs = total_frames as f64 / f64::from(spec.sample_rate.max(1));

    tracing::debug!(
        "Read {} frame gains from {} ({}Hz, {} channels, {:.2}s)",
        gains.len(),
        path.display(),
        spec.sample_rate,
        channels,
        duration_secs
    );

    Ok(FrameGains {
        gains,
        sample_rate: spec.sample_rate,
        channels,
        frame_size,
        duration_secs,
    })
}

/// Parses gains separated by whitespace or commas.
///
/// # Errors
/// - If a token is not an integer
pub fn read_gain_list(text: &str) -> Result<Vec<i32>> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|e| WaveformError::Parse(format!("'{token}': {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    #[test]
    fn test_frame_gains_mono() {
        let samples = [0i16, 100, -400, 9, 16, -1];
        let gains = frame_gains(&samples, 1, 3).unwrap();
        assert_eq!(gains, vec![20, 4]);
    }

    #[test]
    fn test_frame_gains_averages_channels() {
        // Stereo pairs average to 50 and 200.
        let samples = [100i16, 0, -300, -100];
        let gains = frame_gains(&samples, 2, 2).unwrap();
        assert_eq!(gains, vec![14]);
    }

    #[test]
    fn test_frame_gains_partial_frame_and_extremes() {
        let samples = [i16::MIN, 0, 0, 4];
        let gains = frame_gains(&samples, 1, 3).unwrap();
        assert_eq!(gains, vec![181, 2]);
        assert!(frame_gains(&[], 1, 3).unwrap().is_empty());
    }

    #[test]
    fn test_frame_gains_rejects_zero_sizes() {
        assert!(frame_gains(&[1, 2], 0, 4).is_err());
        assert!(frame_gains(&[1, 2], 1, 0).is_err());
    }

    #[test]
    fn test_frame_gains_rejects_oversized_frame() {
        let err = frame_gains(&[1, 2], 2, usize::MAX).unwrap_err();
        assert!(matches!(err, WaveformError::InvalidArgument(_)));
    }

    #[test]
    fn test_read_wav_gains() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for i in 0..8000 {
            let sample = if i < 4000 { 0 } else { 10_000 };
            writer.write_sample(sample as i16).unwrap();
        }
        writer.finalize().unwrap();

        let frames = read_wav_gains(&path, 1000).unwrap();
        assert_eq!(frames.gains.len(), 8);
        assert_eq!(frames.gains[..4], [0, 0, 0, 0]);
        assert_eq!(frames.gains[4..], [100, 100, 100, 100]);
        assert_eq!(frames.sample_rate, 8000);
        assert!((frames.duration_secs - 1.0).abs() < 1e-9);
        assert!((frames.seconds_per_frame() - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_read_wav_rejects_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();

        let err = read_wav_gains(&path, FRAME_SIZE).unwrap_err();
        assert!(matches!(err, WaveformError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_read_gain_list() {
        assert_eq!(read_gain_list("1 2,3\n 4\t5").unwrap(), vec![1, 2, 3, 4, 5]);
        assert!(read_gain_list("").unwrap().is_empty());
        assert!(matches!(
            read_gain_list("1 two 3"),
            Err(WaveformError::Parse(_))
        ));
    }
}
