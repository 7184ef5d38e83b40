//! Notification input sources.
//!
//! - File loading for read-once file input
//! - Stdin for piped input
//! - [`InputSource`] over both

use crate::model::error::InputError;
use crate::model::NotificationItem;
use std::path::PathBuf;
use tracing::warn;

pub mod file;
pub mod record;
pub mod stdin;

pub use file::FileSource;
pub use record::{parse_line, ActionRecord, NotificationRecord, ProgressRecord};
pub use stdin::StdinSource;

/// Numbers incoming lines and parses them, skipping blanks and logging
/// malformed records.
#[derive(Debug, Default)]
pub(crate) struct LineParser {
    line: usize,
}

impl LineParser {
    pub(crate) fn parse(&mut self, text: &str) -> Option<NotificationItem> {
        self.line += 1;
        if text.trim().is_empty() {
            return None;
        }
        match parse_line(self.line, text) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(error = %e, "Skipping malformed notification record");
                None
            }
        }
    }
}

/// Where notifications come from.
#[derive(Debug)]
pub enum InputSource {
    /// Read-once file.
    File(FileSource),
    /// Piped stdin.
    Stdin(StdinSource),
}

impl InputSource {
    /// Poll for new notifications. Never blocks.
    ///
    /// - File: all records on the first call, nothing after
    /// - Stdin: whatever arrived since the last call
    ///
    /// # Errors
    ///
    /// Returns `InputError` for I/O errors.
    pub fn poll(&mut self) -> Result<Vec<NotificationItem>, InputError> {
        match self {
            InputSource::File(f) => f.drain_entries(),
            InputSource::Stdin(s) => s.poll_and_parse(),
        }
    }

    /// Whether more records may still arrive.
    pub fn is_live(&self) -> bool {
        match self {
            InputSource::File(_) => false,
            InputSource::Stdin(s) => !s.is_complete(),
        }
    }
}

/// Use `file` if given, else piped stdin.
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is given and stdin is a terminal.
/// Returns `InputError::FileNotFound` if the file does not exist.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path)?)),
        None => Ok(InputSource::Stdin(StdinSource::new()?)),
    }
}
