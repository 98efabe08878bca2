//! In-memory logger that captures records

use std::sync::RwLock;

use super::traits::{LogLevel, Logger};

/// Logger that keeps every record in memory
///
/// Useful for asserting on diagnostics in tests or surfacing them to a host
/// after a lookup completes.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: RwLock<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    /// Create a new empty memory logger
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured records, oldest first
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Messages captured at a given level
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// Whether any record contains the given text
    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|(_, m)| m.contains(needle))
    }

    /// Drop all captured records
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.write() {
            records.clear();
        }
    }

    fn push(&self, level: LogLevel, message: &str) {
        if let Ok(mut records) = self.records.write() {
            records.push((level, message.to_string()));
        }
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.push(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}
