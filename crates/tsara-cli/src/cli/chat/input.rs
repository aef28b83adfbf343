//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline` so input can be awaited alongside
//! settlements, with EOF (Ctrl+D) and interrupt (Ctrl+C) surfaced as events.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug)]
pub enum InputEvent {
    /// User submitted a line. Kept exactly as typed.
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create the input handler and a `SharedWriter` for printing above the
    /// prompt without corrupting it.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub fn update_prompt(&mut self, prompt: &str) {
        if let Err(err) = self.rl.update_prompt(prompt) {
            tracing::debug!(error = %err, "failed to update prompt");
        }
    }

    /// Read a line of input.
    ///
    /// Lines are not trimmed here; the controller keeps message text verbatim
    /// and decides what counts as blank.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                self.rl.add_history_entry(line.clone());
                InputEvent::Message(line)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(err) => {
                tracing::warn!(error = %err, "input error, ending session");
                InputEvent::Eof
            }
        }
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        if let Err(err) = self.rl.clear() {
            tracing::debug!(error = %err, "failed to clear screen");
        }
    }

    /// Restore the terminal before exit.
    pub fn flush(&mut self) {
        if let Err(err) = self.rl.flush() {
            tracing::debug!(error = %err, "failed to flush readline");
        }
    }
}
