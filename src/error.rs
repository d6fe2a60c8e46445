//! Error types shared by every stage of the detector.

use std::io;
use thiserror::Error;

/// Result type for pitch detection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a detector
#[derive(Error, Debug)]
pub enum Error {
    /// The requested clip does not fit inside the audio
    #[error(
        "clip of {clip_length}s starting at {start}s goes beyond the end of the audio ({audio_length}s)"
    )]
    OutOfRange {
        start: f64,
        clip_length: f64,
        audio_length: f64,
    },

    /// Harmonic correlation needs at least one spike
    #[error("no spikes to correlate against")]
    EmptyInput,

    /// A tunable is outside its valid range
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The audio source cannot provide integer PCM samples
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Reading or decoding a WAV container failed
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
