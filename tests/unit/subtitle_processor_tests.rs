/*!
 * Tests for SRT parsing functionality
 */

use anyhow::Result;
use srtcue::subtitle_processor::{parse_srt_file, parse_srt_string, SubtitleEntry};
use srtcue::{LoadError, ParseError};
use crate::common;

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
}

/// Two well-formed cues with index lines
#[test]
fn test_parse_srt_string_withTwoCues_shouldMatchLiteralTimestamps() -> Result<()> {
    let input = "1\n00:00:01,000 --> 00:00:02,500\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nWorld\n\n";

    let entries = parse_srt_string(input)?;

    assert_eq!(entries.len(), 2);
    assert_close(entries[0].start, 1.0);
    assert_close(entries[0].end, 2.5);
    assert_eq!(entries[0].text, "Hello");
    assert_close(entries[1].start, 3.0);
    assert_close(entries[1].end, 4.0);
    assert_eq!(entries[1].text, "World");

    Ok(())
}

/// A timing line without milliseconds between two valid cues
#[test]
fn test_parse_srt_string_withMalformedMiddleBlock_shouldKeepValidCues() -> Result<()> {
    let input = "1\n00:00:01,000 --> 00:00:02,000\nfirst\n\n\
                 2\n00:00:02 --> 00:00:03\nbroken\n\n\
                 3\n00:00:04,000 --> 00:00:05,000\nlast\n";

    let entries = parse_srt_string(input)?;

    let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "last"]);

    Ok(())
}

#[test]
fn test_parse_srt_string_withNoCues_shouldReturnEmptyError() {
    assert_eq!(parse_srt_string(""), Err(ParseError::Empty));
    assert_eq!(parse_srt_string("just some prose\nwithout timing\n"), Err(ParseError::Empty));
}

/// Non-decreasing starts are preserved in file order
#[test]
fn test_parse_srt_string_withSampleFile_shouldKeepOrder() -> Result<()> {
    let entries = parse_srt_string(common::SAMPLE_SRT)?;

    assert_eq!(entries.len(), 3);
    assert!(entries.windows(2).all(|w| w[0].start <= w[1].start));
    assert_eq!(entries[1].text, "It contains\nmultiple lines.");

    Ok(())
}

/// Extra blank lines and trailing whitespace between cues
#[test]
fn test_parse_srt_string_withLooseSeparators_shouldParseAll() -> Result<()> {
    let input = "\n\n1\n00:00:01,000 --> 00:00:02,000\nA\n   \n\n\n2\n00:00:03,000-->00:00:04,000\nB";

    let entries = parse_srt_string(input)?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].text, "B");
    assert_close(entries[1].start, 3.0);

    Ok(())
}

/// Text lines are kept verbatim, including inner whitespace
#[test]
fn test_parse_srt_string_withIndentedText_shouldKeepLinesVerbatim() -> Result<()> {
    let input = "00:00:00,000 --> 00:00:01,000\n  - Who's there?\n<i>Nobody.</i>\n";

    let entries = parse_srt_string(input)?;

    assert_eq!(entries[0].text, "  - Who's there?\n<i>Nobody.</i>");

    Ok(())
}

#[test]
fn test_subtitle_entry_display_shouldRenderSrtBlock() {
    let entry = SubtitleEntry::new(61.234, 65.432, "Hello\nWorld");

    assert_eq!(entry.to_string(), "00:01:01,234 --> 00:01:05,432\nHello\nWorld\n\n");
    assert_close(entry.duration(), 4.198);
}

#[test]
fn test_parse_srt_file_withValidFile_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "log1.srt")?;

    let entries = parse_srt_file(&path)?;

    assert_eq!(entries.len(), 3);

    Ok(())
}

#[test]
fn test_parse_srt_file_withMissingFile_shouldReturnNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("missing.srt");

    assert_eq!(parse_srt_file(&path), Err(LoadError::NotFound(path.clone())));

    Ok(())
}

#[test]
fn test_parse_srt_file_withInvalidUtf8_shouldReturnReadError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("bad.srt");
    let mut bytes = b"1\n00:00:01,000 --> 00:00:02,000\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
    std::fs::write(&path, bytes)?;

    assert!(matches!(parse_srt_file(&path), Err(LoadError::Read { .. })));

    Ok(())
}

#[test]
fn test_parse_srt_file_withoutCues_shouldReturnParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "empty.srt", "")?;

    assert!(matches!(
        parse_srt_file(&path),
        Err(LoadError::Parse { source: ParseError::Empty, .. })
    ));

    Ok(())
}
