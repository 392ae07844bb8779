//! Audit trail of enclave invocations.
//!
//! One event is recorded per command invocation, success or failure. An
//! event carries the command identifier, the outcome code, and a
//! timestamp — never key bytes, buffer contents, or anything derived from
//! them. The log is append-only and supports pluggable sinks for
//! forwarding events to files or external collectors.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sink that receives audit events. Implement this to forward events to
/// a file, database, or other persistent store.
pub trait AuditSink: Send {
    /// Called once per enclave invocation.
    fn record(&mut self, event: AuditEvent);
}

/// One enclave invocation, reduced to identifiers only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The raw command identifier the caller sent (which may not map to
    /// any known command).
    pub command_id: u32,
    /// `"ok"`, or the stable error code of the failure.
    pub outcome: String,
    /// When the invocation completed.
    pub at: DateTime<Utc>,
}

/// An append-only log of all invocations, with optional forwarding.
#[derive(Default)]
pub struct AuditLog {
    events: Vec<AuditEvent>,
    sinks: Vec<Box<dyn AuditSink>>,
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("events", &self.events)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink to receive a copy of every event from now on.
    pub fn add_sink(&mut self, sink: Box<dyn AuditSink>) {
        self.sinks.push(sink);
    }

    /// Append an event and forward it to every attached sink.
    pub fn record(&mut self, event: AuditEvent) {
        for sink in self.sinks.iter_mut() {
            sink.record(event.clone());
        }
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuditEvent> {
        self.events.iter()
    }
}

// ---------------------------------------------------------------------------
// Built-in sink: file
// ---------------------------------------------------------------------------

/// Writes audit events as JSON lines (one per event) to a file.
/// Creates the file if it doesn't exist; appends if it does.
pub struct FileAuditSink {
    file: std::fs::File,
}

impl FileAuditSink {
    /// Open or create a file for append-only audit logging.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if let Ok(line) = serde_json::to_string(&event) {
            let _ = writeln!(self.file, "{line}");
            let _ = self.file.flush();
        }
    }
}
