//! Error types for yasp-core organized by processing stage.

use std::collections::TryReserveError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Interpretation error variants organized by processing stage.
#[derive(Debug, Error)]
pub enum Error {
    /// File open, read or write failure
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Audio decoding or validation failure
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Decoding engine could not be constructed
    #[error(transparent)]
    EngineInit(#[from] EngineInitError),

    /// Decoding engine failed while running a search
    #[error("decode failed: {message}")]
    Decode { message: String },

    /// Transcript word missing from the engine vocabulary
    #[error("unknown word in transcript: {word}")]
    UnknownWord { word: String },

    /// Word sequence carries no utterance start marker
    #[error("timing incompatibility between word and phoneme sequences, result may be unreliable")]
    TimingIncompatibility,

    /// Single transcript token exceeds the token buffer
    #[error("word is too large in transcript (limit {limit} bytes)")]
    WordTooLong { limit: usize },

    /// Transcript stream failed before end-of-file
    #[error("failed to read transcript: {0}")]
    TranscriptRead(#[source] std::io::Error),

    /// Missing or contradictory caller input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Nested transcript could not be printed
    #[error("failed to serialize transcript: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Segment or token storage could not grow
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

/// Engine construction errors (model files, configuration).
#[derive(Debug, Error)]
pub enum EngineInitError {
    /// Acoustic model directory not found
    #[error("acoustic model not found: {}", .0.display())]
    MissingAcousticModel(PathBuf),

    /// Language model file not found
    #[error("language model not found: {}", .0.display())]
    MissingLanguageModel(PathBuf),

    /// Pronunciation dictionary not found
    #[error("pronunciation dictionary not found: {}", .0.display())]
    MissingDictionary(PathBuf),

    /// Pronunciation dictionary line could not be parsed
    #[error("malformed dictionary entry at {}:{line}", .path.display())]
    MalformedDictionary { path: PathBuf, line: usize },

    /// Recorded decode could not be loaded
    #[error("invalid decode recording {}: {message}", .path.display())]
    InvalidRecording { path: PathBuf, message: String },
}

/// Audio loading and validation errors.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Sample rate validation failed
    #[error("invalid sample rate: expected {expected}Hz, got {got}Hz")]
    InvalidSampleRate { expected: u32, got: u32 },

    /// Channel count validation failed
    #[error("invalid channel count: expected mono, got {0} channels")]
    InvalidChannels(u16),

    /// Sample encoding other than 16-bit integer PCM
    #[error("unsupported sample format: {bits}-bit {format}")]
    UnsupportedFormat { bits: u16, format: &'static str },

    /// WAV file format error
    #[error(transparent)]
    Hound(#[from] hound::Error),
}

/// Result type alias for yasp-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
