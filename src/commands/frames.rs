//! Extract per-frame gains from a WAV file.

use anyhow::Context;
use std::path::Path;

use crate::config::RecwaveConfig;
use crate::waveform;

/// Prints one gain per line, preceded by a summary comment.
///
/// # Errors
/// - If the file cannot be read or is not 16-bit PCM
/// - If the frame size is zero
pub fn handle_frames(file: &Path, frame_size: Option<usize>, config: &RecwaveConfig) -> anyhow::Result<()> {
    let frame_size = frame_size.unwrap_or(config.waveform.frame_size);
    let frames = waveform::read_wav_gains(file, frame_size)
        .with_context(|| format!("Failed to extract gains from {}", file.display()))?;

    println!(
        "# {} frames, {}Hz, {} channels, {:.3}s",
        frames.gains.len(),
        frames.sample_rate,
        frames.channels,
        frames.duration_secs
    );
    for gain in &frames.gains {
        println!("{gain}");
    }
    Ok(())
}
