//! Destinations for the generated message.

use std::io::Write;
use std::path::PathBuf;

use dialoguer::Input;

use crate::atomic::write_atomically;
use crate::error::SinkError;

use super::message::GeneratedMessage;

/// Where a finished message goes, and where warnings are shown.
///
/// `deliver` is only called after a fully successful generation.
pub trait MessageSink {
    fn deliver(&mut self, message: &GeneratedMessage) -> Result<(), SinkError>;

    fn warn(&mut self, notice: &str);
}

/// Prints the message to stdout unchanged.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn deliver(&mut self, message: &GeneratedMessage) -> Result<(), SinkError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", message).map_err(SinkError::Stdout)
    }

    fn warn(&mut self, notice: &str) {
        eprintln!("Warning: {}", notice);
    }
}

/// Opens an editable line pre-filled with the message, then prints the
/// reviewed text to stdout.
#[derive(Debug, Default)]
pub struct EditableSink;

impl MessageSink for EditableSink {
    fn deliver(&mut self, message: &GeneratedMessage) -> Result<(), SinkError> {
        let reviewed = Input::<String>::new()
            .with_prompt("Commit message")
            .with_initial_text(message.as_str())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| SinkError::ReviewFailed(e.to_string()))?;

        let reviewed = reviewed.trim();
        if reviewed.is_empty() {
            return Err(SinkError::ReviewFailed("message left empty".to_string()));
        }

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", reviewed).map_err(SinkError::Stdout)
    }

    fn warn(&mut self, notice: &str) {
        eprintln!("Warning: {}", notice);
    }
}

/// Writes the message to a file, e.g. the commit message file handed to a
/// `prepare-commit-msg` hook.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MessageSink for FileSink {
    fn deliver(&mut self, message: &GeneratedMessage) -> Result<(), SinkError> {
        write_atomically(&self.path, format!("{}\n", message).as_bytes()).map_err(|e| {
            SinkError::WriteFailed {
                path: self.path.display().to_string(),
                source: e,
            }
        })
    }

    fn warn(&mut self, notice: &str) {
        eprintln!("Warning: {}", notice);
    }
}
