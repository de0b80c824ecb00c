use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use log::warn;
use walkdir::WalkDir;

use crate::errors::LoadError;

// @module: File and directory utilities

// @const: Extension of subtitle files picked up by directory scans
pub const SUBTITLE_EXTENSION: &str = "srt";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @returns: Filename without directory or extension
    pub fn file_stem<P: AsRef<Path>>(path: P) -> Option<String> {
        path.as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
    }

    /// Find files with a specific extension in a directory, recursively.
    ///
    /// Entries that cannot be visited (permissions, dangling or looping
    /// links) are skipped and returned as `LoadError::Walk` next to the
    /// matches. Results are sorted by file name within each directory so
    /// scans are repeatable.
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> (Vec<PathBuf>, Vec<LoadError>) {
        let mut result = Vec::new();
        let mut errors = Vec::new();
        let wanted = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    errors.push(LoadError::Walk(e.to_string()));
                    continue;
                }
            };
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(wanted) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        (result, errors)
    }

    /// Read a file to a string; fails on invalid UTF-8
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }
}
