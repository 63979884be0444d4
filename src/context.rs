use std::fmt::Display;
use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::style::Color;
use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::channel::{ChannelRegistry, ShutdownGuard};
use crate::clock::{Clock, SystemClock};
use crate::config::LoggerConfig;
use crate::console::{ConsoleSink, ConsoleWriter};
use crate::format::{format_line, FormattedLine, LINE_ENDING};
use crate::state::{Severity, StateMaps};

lazy_static! {
    /// Context behind the free functions and `Logger::new`.
    ///
    /// Writes to stdout with the system clock and default settings. It lives
    /// for the whole process, so hosts that open channels on it should hold
    /// [`shutdown_guard`](crate::shutdown_guard) to get the files flushed and
    /// closed on exit.
    pub(crate) static ref GLOBAL: Arc<LogContext> = Arc::new(LogContext::new(ConsoleWriter::stdout()));
}

/// Everything a write needs: settings, severity table, channels, console
/// and clock.
///
/// Loggers hold an `Arc<LogContext>`. The process-wide one comes from
/// [`LogContext::global`]; tests and embedders can build their own and bind
/// loggers to it with [`Logger::with_context`](crate::Logger::with_context).
///
/// Settings and the severity table are behind read-write locks. Changing
/// them takes effect on the next write of every logger sharing the context.
pub struct LogContext {
    config: RwLock<LoggerConfig>,
    maps: RwLock<StateMaps>,
    channels: ChannelRegistry,
    console: ConsoleWriter<ConsoleSink>,
    clock: Box<dyn Clock>,
}

impl LogContext {
    pub fn new(console: ConsoleWriter<ConsoleSink>) -> Self {
        Self {
            config: RwLock::new(LoggerConfig::default()),
            maps: RwLock::new(StateMaps::new()),
            channels: ChannelRegistry::new(),
            console,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_config(self, config: LoggerConfig) -> Self {
        self.channels.set_patterns(config.timestamps.clone());
        *self.config.write() = config;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_maps(self, maps: StateMaps) -> Self {
        *self.maps.write() = maps;
        self
    }

    /// The process-wide context.
    pub fn global() -> Arc<LogContext> {
        Arc::clone(&GLOBAL)
    }

    /// Snapshot of the current settings.
    pub fn config(&self) -> LoggerConfig {
        self.config.read().clone()
    }

    /// Edits the settings in place.
    pub fn configure(&self, edit: impl FnOnce(&mut LoggerConfig)) {
        let mut config = self.config.write();
        edit(&mut config);
        self.channels.set_patterns(config.timestamps.clone());
    }

    /// Snapshot of the severity table.
    pub fn maps(&self) -> StateMaps {
        self.maps.read().clone()
    }

    pub fn set_state_prefix(&self, severity: Severity, prefix: impl Into<String>) {
        self.maps.write().set_prefix(severity, prefix);
    }

    pub fn set_state_color(&self, severity: Severity, color: Color) {
        self.maps.write().set_color(severity, color);
    }

    /// Restores the built-in prefixes and colors.
    pub fn reset_states(&self) {
        self.maps.write().reset();
    }

    pub fn channels(&self) -> &ChannelRegistry {
        &self.channels
    }

    pub fn console(&self) -> &ConsoleWriter<ConsoleSink> {
        &self.console
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    /// Opens a channel, expanding `<Date>` / `<Time>` with this context's clock.
    pub fn begin_channel(
        &self,
        name: &str,
        directory: impl AsRef<Path>,
        filename_format: &str,
        safe_replacement: char,
    ) -> io::Result<bool> {
        self.channels
            .begin_channel_at(name, directory, filename_format, safe_replacement, &self.now())
    }

    pub fn shutdown_guard(&self) -> ShutdownGuard<'_> {
        self.channels.shutdown_guard()
    }

    /// Formats one line against the current table and settings.
    pub fn format(
        &self,
        severity: Option<Severity>,
        timestamp_enabled: bool,
        source: &str,
        message: Option<&dyn Display>,
    ) -> FormattedLine {
        let config = self.config.read();
        let maps = self.maps.read();
        format_line(&maps, &config, &self.now(), severity, timestamp_enabled, source, message)
    }

    /// Sends a formatted line to the console and returns the text written.
    pub fn emit(&self, line: &FormattedLine) -> String {
        self.console
            .raw_write(&line.prefix, &line.source_tag, &line.message, line.color)
    }

    /// Console-only line from `source`, or the default source when `None`.
    pub fn write_line(&self, message: impl Display, source: Option<&str>, severity: impl Into<Option<Severity>>) {
        let line = self.format_static(&message, source, severity.into());
        self.emit(&line.terminated());
    }

    /// Like [`write_line`](Self::write_line) without the terminator.
    pub fn write(&self, message: impl Display, source: Option<&str>, severity: impl Into<Option<Severity>>) {
        let line = self.format_static(&message, source, severity.into());
        self.emit(&line);
    }

    fn format_static(&self, message: &dyn Display, source: Option<&str>, severity: Option<Severity>) -> FormattedLine {
        let (add_timestamp, default_source) = {
            let config = self.config.read();
            (config.add_timestamp, config.default_source.clone())
        };
        self.format(severity, add_timestamp, source.unwrap_or(&default_source), Some(message))
    }

    /// Writes only `message`, in `color`.
    pub fn raw(&self, message: impl Display, color: Color) {
        self.console.raw_write("", "", &message.to_string(), color);
    }

    /// Writes `message` and a line terminator, in `color`.
    pub fn raw_line(&self, message: impl Display, color: Color) {
        let mut text = message.to_string();
        text.push_str(LINE_ENDING);
        self.console.raw_write("", "", &text, color);
    }

    /// Writes a bare line terminator.
    pub fn skip_line(&self) {
        self.console.raw_write("", "", LINE_ENDING, Color::White);
    }
}
