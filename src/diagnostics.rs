//! Diagnostics sink handed to the engine.
//!
//! The engine reports through this trait instead of a global logger so a
//! single decision can be observed in isolation.

#[cfg(test)]
use std::sync::Mutex;

/// Receives diagnostic messages emitted while processing one resource.
pub trait Diagnostics {
    fn debug(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards diagnostics to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Level of a recorded diagnostic.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Warn,
}

/// Keeps every message in memory for asserting on engine output.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: Mutex<Vec<(Level, String)>>,
}

#[cfg(test)]
impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded messages in emission order.
    pub fn entries(&self) -> Vec<(Level, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the recorded warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message)
            .collect()
    }

    fn record(&self, level: Level, message: &str) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push((level, message.to_string()));
    }
}

#[cfg(test)]
impl Diagnostics for RecordingDiagnostics {
    fn debug(&self, message: &str) {
        self.record(Level::Debug, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }
}
