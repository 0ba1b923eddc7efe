//! Command output as a capability.
//!
//! Commands never print directly; they emit events into an [`OutputSink`].
//! The CLI buffers events and renders them at the end of the run, tests
//! inspect the buffer, and library callers may pass [`NullOutput`]. Silence
//! is the success signal: commands only emit on results or errors.

use colored::Colorize;
use serde_json::Value;
use std::sync::Mutex;

/// One unit of user-facing command output.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// A result line, optionally backed by the full JSON payload it
    /// summarizes.
    Print {
        message: String,
        json: Option<Value>,
    },
    /// A diagnostic. Any error event means the run was not fully clean.
    Error { message: String },
}

impl OutputEvent {
    pub fn print(message: impl Into<String>, json: Option<Value>) -> Self {
        OutputEvent::Print {
            message: message.into(),
            json,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        OutputEvent::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OutputEvent::Error { .. })
    }
}

/// Capability consumed by the command layer.
pub trait OutputSink: Send + Sync {
    fn emit(&self, event: OutputEvent);
}

/// Accumulates events in order for later inspection or rendering.
#[derive(Debug, Default)]
pub struct BufferedOutput {
    events: Mutex<Vec<OutputEvent>>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub fn events(&self) -> Vec<OutputEvent> {
        self.events.lock().expect("output buffer poisoned").clone()
    }

    pub fn has_errors(&self) -> bool {
        self.events
            .lock()
            .expect("output buffer poisoned")
            .iter()
            .any(OutputEvent::is_error)
    }

    /// Render buffered events: prints to stdout, errors to stderr.
    pub fn render(&self) {
        for event in self.events() {
            match event {
                OutputEvent::Print { message, .. } => println!("{message}"),
                OutputEvent::Error { message } => eprintln!("{} {message}", "✘".red()),
            }
        }
    }
}

impl OutputSink for BufferedOutput {
    fn emit(&self, event: OutputEvent) {
        self.events.lock().expect("output buffer poisoned").push(event);
    }
}

/// Discards everything. Valid for library use where no terminal exists.
#[derive(Debug, Default)]
pub struct NullOutput;

impl OutputSink for NullOutput {
    fn emit(&self, _event: OutputEvent) {}
}
