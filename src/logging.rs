//! In-memory logger feeding the status panel.
//!
//! The terminal belongs to the user interface while it runs, so log records are kept in a bounded
//! buffer instead of being written out. The most recent ones are shown on screen.

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Number of records kept before the oldest are dropped.
const CAPACITY: usize = 64;

/// Global logger instance.
static LOGGER: OnceLock<StatusLogger> = OnceLock::new();

/// A single log record as shown on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Severity of the record.
    pub level: Level,
    /// Formatted text of the record.
    pub text: String,
}

/// Logger keeping the latest records in memory.
#[derive(Debug)]
pub struct StatusLogger {
    /// Most verbose level recorded.
    max_level: LevelFilter,
    /// Recorded messages, oldest first.
    messages: Mutex<VecDeque<Message>>,
}

impl StatusLogger {
    /// Creates an empty logger recording up to `max_level`.
    const fn new(max_level: LevelFilter) -> Self {
        Self {
            max_level,
            messages: Mutex::new(VecDeque::new()),
        }
    }

    /// Locks the buffer. A panic while logging never leaves the buffer inconsistent, so a poisoned
    /// lock is taken over.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a message, dropping the oldest one when full.
    fn push(&self, message: Message) {
        let mut messages = self.lock();
        if messages.len() == CAPACITY {
            let _ = messages.pop_front();
        }
        messages.push_back(message);
    }

    /// Returns up to `count` of the latest messages, oldest first.
    pub fn recent(&self, count: usize) -> Vec<Message> {
        let messages = self.lock();
        messages
            .iter()
            .skip(messages.len().saturating_sub(count))
            .cloned()
            .collect()
    }
}

impl Log for StatusLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.push(Message {
                level: record.level(),
                text: record.args().to_string(),
            });
        }
    }

    fn flush(&self) {}
}

/// Returns the global logger, creating it on first use.
pub fn logger() -> &'static StatusLogger {
    LOGGER.get_or_init(|| StatusLogger::new(LevelFilter::Info))
}

/// Installs the global logger.
///
/// # Errors
///
/// Returns [`SetLoggerError`] when another logger was installed first.
pub fn init() -> Result<(), SetLoggerError> {
    let logger = logger();
    log::set_logger(logger)?;
    log::set_max_level(logger.max_level);
    Ok(())
}
