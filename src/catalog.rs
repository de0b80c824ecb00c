/*!
 * In-memory index of parsed subtitle sets.
 *
 * The catalog is populated once from a directory scan and is read-only
 * afterwards; share it behind an `Arc` for playback.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};

use crate::errors::LoadError;
use crate::file_utils::{FileManager, SUBTITLE_EXTENSION};
use crate::subtitle_keys::{full_key, line_key};
use crate::subtitle_processor::{parse_srt_file, SubtitleEntry};

/// Host-side text store receiving every derived key at load time
pub trait TextSink {
    fn set_text(&self, key: &str, text: &str);
}

/// Subtitle sets indexed by base key (file stem)
#[derive(Debug, Default, Clone)]
pub struct SubtitleCatalog {
    root: PathBuf,
    sets: HashMap<String, Vec<SubtitleEntry>>,
}

impl SubtitleCatalog {
    /// Create an empty catalog rooted at `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            sets: HashMap::new(),
        }
    }

    /// Scan `directory` recursively for `.srt` files and parse each one.
    ///
    /// A missing root directory is the only fatal error. Files that fail to
    /// read or contain no cues are logged and left out of the catalog.
    pub fn load<P: AsRef<Path>>(directory: P) -> Result<Self, LoadError> {
        Self::load_with_errors(directory).map(|(catalog, _)| catalog)
    }

    /// Like [`SubtitleCatalog::load`], also returning every non-fatal error
    /// hit during the scan (unvisitable entries, unreadable or empty files).
    pub fn load_with_errors<P: AsRef<Path>>(directory: P) -> Result<(Self, Vec<LoadError>), LoadError> {
        let directory = directory.as_ref();
        if !FileManager::dir_exists(directory) {
            return Err(LoadError::NotFound(directory.to_path_buf()));
        }

        let mut catalog = Self::new(directory);
        let (files, mut errors) = FileManager::find_files(directory, SUBTITLE_EXTENSION);
        debug!("Found {} subtitle file(s) under {:?}", files.len(), directory);

        for file in files {
            let Some(key) = FileManager::file_stem(&file) else {
                continue;
            };
            match parse_srt_file(&file) {
                Ok(entries) => catalog.insert(key, entries),
                Err(e) => {
                    warn!("Failed to load SRT file {:?}: {}", file, e);
                    errors.push(e);
                }
            }
        }

        info!(
            "Loaded {} subtitle set(s) from {:?} ({} skipped)",
            catalog.len(),
            directory,
            errors.len()
        );
        Ok((catalog, errors))
    }

    /// Register a set, replacing any previous set with the same key
    pub fn insert(&mut self, base_key: impl Into<String>, entries: Vec<SubtitleEntry>) {
        let base_key = base_key.into();
        if let Some(previous) = self.sets.insert(base_key.clone(), entries) {
            // Stems must be unique across the tree; the later file wins
            warn!(
                "Duplicate subtitle key '{}' replaced a set of {} line(s)",
                base_key,
                previous.len()
            );
        }
    }

    /// Directory the catalog was loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, base_key: &str) -> bool {
        self.sets.contains_key(base_key)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Base keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Entries of a set, empty when the key is not loaded
    pub fn entries_for(&self, base_key: &str) -> &[SubtitleEntry] {
        self.sets.get(base_key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All cue texts of a set joined by a single space
    pub fn full_text(&self, base_key: &str) -> Option<String> {
        self.sets.get(base_key).map(|entries| {
            entries
                .iter()
                .map(|e| e.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    pub fn line_text(&self, base_key: &str, index: usize) -> Option<&str> {
        self.sets
            .get(base_key)
            .and_then(|entries| entries.get(index))
            .map(|e| e.text.as_str())
    }

    /// Push the full text and every line text of every set into `sink`
    pub fn register_texts(&self, sink: &dyn TextSink) {
        for key in self.keys() {
            let entries = self.entries_for(key);
            if let Some(text) = self.full_text(key) {
                sink.set_text(&full_key(key), &text);
            }
            for (i, entry) in entries.iter().enumerate() {
                sink.set_text(&line_key(key, i), &entry.text);
            }
            debug!("Registered {} line(s) for '{}'", entries.len(), key);
        }
    }
}
