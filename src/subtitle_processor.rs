use std::fmt;
use std::path::Path;
use regex::{Captures, Regex};
use once_cell::sync::Lazy;
use log::{debug, warn};
use crate::errors::{LoadError, ParseError};
use crate::file_utils::FileManager;

// @module: SRT parsing

// @const: SRT timing line regex, anchored at the start of the trimmed line
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})")
        .expect("timestamp regex is valid")
});

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Start offset in seconds
    pub start: f64,

    // @field: End offset in seconds
    pub end: f64,

    // @field: Cue text, physical lines joined by '\n'
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        SubtitleEntry {
            start,
            end,
            text: text.into(),
        }
    }

    /// Cue duration in seconds
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end)
    }

    /// Format an offset in seconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(seconds: f64) -> String {
        let ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let secs = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Render entries as an SRT document, numbering cues from 1
pub fn to_srt_string(entries: &[SubtitleEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}\n{}", i + 1, entry))
        .collect()
}

/// Read a UTF-8 SRT file and parse it.
///
/// Invalid UTF-8 is reported as [`LoadError::Read`], a file without any
/// cue as [`LoadError::Parse`].
pub fn parse_srt_file<P: AsRef<Path>>(path: P) -> Result<Vec<SubtitleEntry>, LoadError> {
    let path = path.as_ref();
    if !FileManager::file_exists(path) {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let content = FileManager::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        message: format!("{:#}", e),
    })?;

    parse_srt_string(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse SRT content into subtitle entries.
///
/// Index lines are optional and never validated. A line that is not a
/// timing line where one is expected is skipped, so malformed blocks are
/// dropped without aborting the parse. Entries keep file order.
pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();
    let mut entries = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if is_index_line(lines[i]) {
            i += 1;
        }
        if i >= lines.len() {
            break;
        }

        let Some(caps) = TIMESTAMP_REGEX.captures(lines[i].trim_start()) else {
            if !is_blank(lines[i]) {
                debug!("Skipping line {}, expected a timing line: {}", i + 1, lines[i]);
            }
            i += 1;
            continue;
        };
        i += 1;

        let start = captured_seconds(&caps, 1);
        let end = captured_seconds(&caps, 5);

        let text_start = i;
        while i < lines.len() && !is_blank(lines[i]) {
            i += 1;
        }
        let text = lines[text_start..i].join("\n");

        // Cue separator
        while i < lines.len() && is_blank(lines[i]) {
            i += 1;
        }

        entries.push(SubtitleEntry { start, end, text });
    }

    if entries.is_empty() {
        warn!("No valid subtitle entries found in content");
        return Err(ParseError::Empty);
    }

    Ok(entries)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_index_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// Seconds for the timestamp whose hour group is at `start_idx`
fn captured_seconds(caps: &Captures, start_idx: usize) -> f64 {
    // Every group is a fixed-width run of ASCII digits, so parsing cannot fail
    let part = |offset: usize| -> f64 {
        caps.get(start_idx + offset)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .map_or(0.0, f64::from)
    };

    part(0) * 3600.0 + part(1) * 60.0 + part(2) + part(3) / 1000.0
}
