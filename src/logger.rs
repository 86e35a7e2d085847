//! Logging backend.
//!
//! This module provides a `log` implementation that formats records with a
//! timestamp and level and forwards them to a replaceable sink.

use crate::error::{AppError, AppResult};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, PoisonError};

type Sink = Box<dyn Fn(String) + Send + Sync>;

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
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Logger forwarding formatted records at or above a level to a sink
///
pub struct TaskLogger {
    level: LevelFilter,
    sink: Mutex<Option<Sink>>,
}

impl TaskLogger {
    pub fn new(level: LevelFilter) -> Self {
        TaskLogger {
            level,
            sink: Mutex::new(None),
        }
    }

    pub fn set_sink(&self, sink: Sink) {
        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }
}

impl Log for TaskLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(sink) = self.sink.lock() {
            if let Some(ref sink) = *sink {
                sink(format_log(record));
            }
        }
    }

    fn flush(&self) {}
}

/// Install a stderr logger as the global `log` backend.
///
pub fn init(level: LevelFilter) -> AppResult<()> {
    let logger = TaskLogger::new(level);
    logger.set_sink(Box::new(|line| eprintln!("{}", line)));
    log::set_boxed_logger(Box::new(logger)).map_err(|e| AppError::Logger(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}
