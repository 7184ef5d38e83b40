//! Read-once file input.

use super::LineParser;
use crate::model::error::InputError;
use crate::model::NotificationItem;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A JSONL file loaded in full at construction.
///
/// The first [`FileSource::drain_entries`] returns every valid record;
/// later calls return nothing.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    lines: Option<Vec<String>>,
}

impl FileSource {
    /// Read every line of `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let reader = BufReader::new(File::open(path)?);
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        debug!(path = %path.display(), lines = lines.len(), "Loaded notification file");

        Ok(Self {
            path: path.to_path_buf(),
            lines: Some(lines),
        })
    }

    /// The file this source was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse and hand out all records; empty after the first call.
    ///
    /// Malformed lines are logged and skipped.
    pub fn drain_entries(&mut self) -> Result<Vec<NotificationItem>, InputError> {
        let Some(lines) = self.lines.take() else {
            return Ok(Vec::new());
        };
        let mut parser = LineParser::default();
        Ok(lines
            .iter()
            .filter_map(|line| parser.parse(line))
            .collect())
    }
}
