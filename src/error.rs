//! Error type for the recwave library.

use thiserror::Error;

/// Errors raised by the waveform and timeline APIs.
///
/// The numeric pipeline itself is total over valid input; these variants cover
/// precondition violations and the file-reading helpers.
#[derive(Debug, Error)]
pub enum WaveformError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to parse gain list: {0}")]
    Parse(String),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WaveformError>;

impl WaveformError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
