//! Waveform height profiles.
//!
//! `frames` derives raw per-frame gains from audio; `normalize` turns them into
//! bounded pixel half-heights for rendering.

pub mod frames;
pub mod normalize;

pub use frames::{frame_gains, read_gain_list, read_wav_gains, FrameGains, FRAME_SIZE};
pub use normalize::{
    normalize, normalize_unit, normalize_with_stats, scale_heights, smooth, GainHistogram,
    NormalizeStats,
};
