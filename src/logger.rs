//! Custom logging module.
//!
//! This module provides a `log` backend that writes formatted records to
//! stderr, keeping stdout for command output.

use crate::error::AppError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::Write;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!(
        "{} {} [{}] {}",
        timestamp,
        level_str,
        record.target(),
        record.args()
    )
}

/// Logger that writes records at or above its level to stderr
///
pub struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    pub fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    /// Install as the global logger.
    ///
    pub fn init(self) -> Result<(), AppError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(std::io::stderr(), "{}", format_log(record));
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
