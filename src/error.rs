// src/error.rs
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why an input produced no words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInputKind {
    /// Nothing but whitespace.
    Blank,
    /// Only separators, e.g. `"?!"`.
    NoWords,
}

impl EmptyInputKind {
    pub fn message(self) -> &'static str {
        match self {
            EmptyInputKind::Blank => "Please enter some text to convert!",
            EmptyInputKind::NoWords => "No valid words found. Please enter some text.",
        }
    }
}

/// Failures reported to the user by a conversion. Neither is fatal to the
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("{}", .0.message())]
    EmptyInput(EmptyInputKind),

    /// Words emitted before the fault stay in the session output.
    #[error("An error occurred while converting. Please try again. ({message})")]
    ConversionFailed { emitted: usize, message: String },
}

/// Why a sign image could not be used. Always absorbed into a text
/// fallback, never returned from a conversion.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("asset key {0:?} is not a usable file name")]
    InvalidKey(String),

    #[error("I/O error probing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("probe for {} timed out after {after:?}", path.display())]
    TimedOut { path: PathBuf, after: Duration },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parse error in config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Fatal to a bridge connection: the command stream or the event stream
/// broke.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("bridge I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode bridge output: {0}")]
    Encode(#[from] serde_json::Error),
}
