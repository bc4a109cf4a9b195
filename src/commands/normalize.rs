//! Normalize a gain series into pixel heights.

use anyhow::Context;
use std::fs;
use std::path::Path;

use crate::config::RecwaveConfig;
use crate::waveform::{self, NormalizeStats};

/// Gains loaded from a file, with the duration when the source knows it.
pub(crate) struct LoadedGains {
    pub gains: Vec<i32>,
    pub duration_secs: Option<f64>,
}

/// Loads gains from a WAV file or a whitespace/comma separated text dump.
///
/// # Errors
/// - If the file cannot be read or decoded
pub(crate) fn load_gains(path: &Path, frame_size: usize) -> anyhow::Result<LoadedGains> {
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    if is_wav {
        let frames = waveform::read_wav_gains(path, frame_size)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(LoadedGains {
            gains: frames.gains,
            duration_secs: Some(frames.duration_secs),
        });
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(LoadedGains {
        gains: waveform::read_gain_list(&text)?,
        duration_secs: None,
    })
}

/// Prints one height per line, optionally preceded by the pass statistics.
///
/// # Errors
/// - If the input cannot be loaded
/// - If the gains or half-height are invalid
pub fn handle_normalize(
    file: &Path,
    half_height: Option<i32>,
    show_stats: bool,
    config: &RecwaveConfig,
) -> anyhow::Result<()> {
    let half_height = half_height.unwrap_or(config.waveform.half_height_px);
    let loaded = load_gains(file, config.waveform.frame_size)?;

    let (heights, stats) = waveform::normalize_with_stats(&loaded.gains, half_height)?;
    tracing::info!(
        "Normalized {} frames from {} to half-height {}",
        heights.len(),
        file.display(),
        half_height
    );

    if show_stats {
        for line in stats_lines(stats.as_ref(), loaded.duration_secs) {
            println!("# {line}");
        }
    }
    for height in heights {
        println!("{height}");
    }
    Ok(())
}

fn stats_lines(stats: Option<&NormalizeStats>, duration_secs: Option<f64>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(duration) = duration_secs {
        lines.push(format!("duration_secs {duration:.3}"));
    }
    match stats {
        Some(stats) => {
            lines.push(format!("scale_factor {:.6}", stats.scale_factor));
            lines.push(format!("min_gain {}", stats.min_gain));
            lines.push(format!("max_gain {}", stats.max_gain));
            lines.push(format!("range {}", stats.range));
        }
        None => lines.push("empty series".to_string()),
    }
    lines
}
