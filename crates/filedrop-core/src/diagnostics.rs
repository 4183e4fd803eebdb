//! Per-request diagnostic trace.
//!
//! The pipeline records what it saw and decided at each step. Lines are always
//! emitted as `tracing` debug events; the HTTP layer decides whether the
//! collected lines are also returned to the client.

#[derive(Debug, Clone, Default)]
pub struct UploadTrace {
    entries: Vec<String>,
}

impl UploadTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        tracing::debug!(trace = %entry, "Upload trace");
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}
