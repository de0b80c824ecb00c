/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use srtcue::{DuplicateRegistrationError, EmitError, LoadError, ParseError};

#[test]
fn test_load_error_display_withNotFound_shouldNamePath() {
    let err = LoadError::NotFound(PathBuf::from("/missing/subtitles"));
    assert_eq!(err.to_string(), "Subtitle path does not exist: /missing/subtitles");
}

#[test]
fn test_load_error_parse_shouldExposeSource() {
    use std::error::Error;

    let err = LoadError::Parse {
        path: PathBuf::from("log1.srt"),
        source: ParseError::Empty,
    };

    assert!(err.to_string().contains("log1.srt"));
    assert_eq!(err.source().map(|s| s.to_string()), Some("No subtitle cues found".to_string()));
}

#[test]
fn test_load_error_walk_shouldCarryMessage() {
    let err = LoadError::Walk("IO error for operation on /subs/x.srt: No such file".to_string());
    assert!(err.to_string().starts_with("Failed to walk subtitle directory: IO error"));
}

#[test]
fn test_host_errors_display_shouldNameKey() {
    let err = EmitError::new("PDASubtitleLib_a_0", "full");
    assert_eq!(err.to_string(), "Host sink rejected PDASubtitleLib_a_0: full");

    let err = DuplicateRegistrationError("log1".to_string());
    assert_eq!(err.to_string(), "Log entry already registered: log1");
}
