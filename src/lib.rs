//! # Channel Logger
//!
//! A small, synchronous, human-facing logger. Every line goes to the console
//! with a colored severity prefix and a source tag, and can be mirrored to a
//! named log file ("channel") shared by any number of loggers.
//!
//! ```text
//! [Saturday, March 9, 2024 2:05:07 PM] [+] [Main] Initialized successfully
//! ```
//!
//! ## Main Components
//!
//! * `Severity` / `StateMaps`: prefix and color for each kind of line
//! * `ChannelRegistry`: named log files, opened once and written by name
//! * `format_line`: composes timestamp, prefix, source tag and message
//! * `ConsoleWriter`: serialized, colored console output
//! * `Logger`: a named handle, optionally bound to one channel
//! * `LogContext`: the settings, table, channels and console a logger writes
//!   through; a global one backs the free functions below
//!
//! ## Quick Start
//!
//! ```
//! use channel_logger::{ChannelOptions, Logger, Severity};
//! # let dir = tempfile::tempdir().unwrap();
//!
//! // Flushes and closes every channel when `main` returns.
//! let _guard = channel_logger::shutdown_guard();
//!
//! let log = Logger::with_new_channel("Main", ChannelOptions::new("quick-start", dir.path(), "run-<Date>.log"))?;
//! log.write_line("Initialized successfully", Severity::Success);
//!
//! // Static writes are console-only.
//! channel_logger::write_line("no logger needed", Some("Setup"), Severity::Info);
//! # Ok::<(), channel_logger::LoggerError>(())
//! ```

pub mod channel;
pub mod clock;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod format;
pub mod logger;
pub mod state;

use std::fmt::Display;

pub use channel::{windows_safe_name, ChannelRegistry, ShutdownGuard};
pub use config::{LoggerConfig, MissingChannelPolicy, TimestampFormat};
pub use console::{ConsoleSink, ConsoleWriter};
pub use context::LogContext;
pub use crossterm::style::Color;
pub use error::{LoggerError, Result};
pub use format::{format_line, FormattedLine, LINE_ENDING};
pub use logger::{ChannelOptions, Logger};
pub use state::{Severity, StateMaps};

/// Closes every channel of the global context when released or dropped.
pub fn shutdown_guard() -> ShutdownGuard<'static> {
    let global: &'static LogContext = &context::GLOBAL;
    global.shutdown_guard()
}

/// Console-only line from `source` (or the configured default source).
pub fn write_line(message: impl Display, source: Option<&str>, severity: impl Into<Option<Severity>>) {
    context::GLOBAL.write_line(message, source, severity);
}

/// Console-only write without a line terminator.
pub fn write(message: impl Display, source: Option<&str>, severity: impl Into<Option<Severity>>) {
    context::GLOBAL.write(message, source, severity);
}

/// Writes `message` in `color`, without prefix or terminator.
pub fn raw(message: impl Display, color: Color) {
    context::GLOBAL.raw(message, color);
}

/// Writes `message` and a line terminator in `color`, without prefix.
pub fn raw_line(message: impl Display, color: Color) {
    context::GLOBAL.raw_line(message, color);
}

pub fn skip_line() {
    context::GLOBAL.skip_line();
}

/// Changes the prefix of `severity` for every logger on the global context.
pub fn set_state_prefix(severity: Severity, prefix: impl Into<String>) {
    context::GLOBAL.set_state_prefix(severity, prefix);
}

/// Changes the color of `severity` for every logger on the global context.
pub fn set_state_color(severity: Severity, color: Color) {
    context::GLOBAL.set_state_color(severity, color);
}

/// Edits the global settings.
pub fn configure(edit: impl FnOnce(&mut LoggerConfig)) {
    context::GLOBAL.configure(edit);
}

/// The current local time rendered with the global full timestamp pattern.
pub fn timestamp() -> String {
    let now = context::GLOBAL.now();
    context::GLOBAL.config().timestamps.render_full(&now)
}
