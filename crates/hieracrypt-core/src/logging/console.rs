//! Console logger

use super::traits::{LogLevel, Logger};

/// Writes diagnostics to stderr, dropping records below a minimum level
///
/// Every line is `<prefix> <LEVEL>: <message>`. Defaults to prefix `[hiera]`
/// and minimum level `Warn`, so lookup tracing stays quiet unless asked for.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            prefix: "[hiera]".to_string(),
            min_level: LogLevel::Warn,
        }
    }

    /// Use a custom line prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Emit records at `level` and above
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Emit everything, including per-source lookup tracing
    pub fn verbose() -> Self {
        Self::new().with_min_level(LogLevel::Debug)
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn format(&self, level: LogLevel, message: &str) -> String {
        format!("{} {}: {}", self.prefix, level.to_string().trim_end(), message)
    }

    fn emit(&self, level: LogLevel, message: &str) {
        if self.enabled(level) {
            eprintln!("{}", self.format(level, message));
        }
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }
}
