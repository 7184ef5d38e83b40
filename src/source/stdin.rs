//! Piped stdin input.
//!
//! A reader thread forwards lines over a channel so the event loop can
//! poll without blocking.

use super::LineParser;
use crate::model::error::InputError;
use crate::model::NotificationItem;
use std::io::{BufRead, BufReader, IsTerminal, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::warn;

enum ReaderMessage {
    Line(String),
    Failed(std::io::Error),
}

/// Stdin source for piped JSONL input.
///
/// Works both for a finite pipe (`cat notes.jsonl | notiview`) and for a
/// producer that keeps writing.
pub struct StdinSource {
    receiver: Receiver<ReaderMessage>,
    parser: LineParser,
    complete: bool,
}

impl std::fmt::Debug for StdinSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinSource")
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}

impl StdinSource {
    /// Read from the process stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is an interactive terminal.
    pub fn new() -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(stdin))
    }

    /// Read from any reader on a background thread.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(reader).lines() {
                let message = match line {
                    Ok(line) => ReaderMessage::Line(line),
                    Err(e) => ReaderMessage::Failed(e),
                };
                let failed = matches!(message, ReaderMessage::Failed(_));
                if sender.send(message).is_err() || failed {
                    break;
                }
            }
        });
        Self {
            receiver,
            parser: LineParser::default(),
            complete: false,
        }
    }

    /// Parse every line received so far. Never blocks.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the reader thread hit an I/O error; the
    /// source is complete afterwards.
    pub fn poll_and_parse(&mut self) -> Result<Vec<NotificationItem>, InputError> {
        let mut items = Vec::new();
        while !self.complete {
            match self.receiver.try_recv() {
                Ok(ReaderMessage::Line(line)) => items.extend(self.parser.parse(&line)),
                Ok(ReaderMessage::Failed(e)) => {
                    warn!(error = %e, "Stdin read failed");
                    self.complete = true;
                    return Err(InputError::Io(e));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.complete = true,
            }
        }
        Ok(items)
    }

    /// True once the writer closed the pipe and every line was drained.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
