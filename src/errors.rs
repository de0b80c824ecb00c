/*!
 * Error types for the srtcue library.
 *
 * This module contains custom error types for the parser, the catalog,
 * the scheduler's host sinks and the playback controller, using the
 * thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing SRT content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No cue could be parsed from the input
    #[error("No subtitle cues found")]
    Empty,
}

/// Errors that can occur when loading subtitle files or directories
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Missing file or directory
    #[error("Subtitle path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read as UTF-8 text
    #[error("Failed to read subtitle file {}: {message}", path.display())]
    Read {
        /// File that failed to load
        path: PathBuf,
        /// Underlying IO or decoding error
        message: String,
    },

    /// A directory entry could not be visited during the scan
    #[error("Failed to walk subtitle directory: {0}")]
    Walk(String),

    /// The file was read but contained no cues
    #[error("No subtitles in {}: {source}", path.display())]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Parser failure
        source: ParseError,
    },
}

/// Failure reported by a host sink (display queue or log book)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Host sink rejected {key}: {message}")]
pub struct EmitError {
    /// Key that was being emitted
    pub key: String,
    /// Host-supplied reason
    pub message: String,
}

impl EmitError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Attempt to add a log entry that the host already knows about
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Log entry already registered: {0}")]
pub struct DuplicateRegistrationError(pub String);
