use std::fmt;

use chrono::{DateTime, Local};
use crossterm::style::Color;

use crate::config::LoggerConfig;
use crate::state::{Severity, StateMaps};

/// Line terminator appended by the line-oriented write operations.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// A composed log line, split the way the console writer consumes it.
///
/// `prefix` already carries the optional `[timestamp] ` part. The `Display`
/// output is the full line: `prefix + source_tag + message`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedLine {
    pub prefix: String,
    pub source_tag: String,
    pub message: String,
    pub color: Color,
}

impl FormattedLine {
    /// Appends the platform line terminator to the message part.
    pub fn terminated(mut self) -> Self {
        self.message.push_str(LINE_ENDING);
        self
    }
}

impl fmt::Display for FormattedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.source_tag, self.message)
    }
}

/// Builds one log line.
///
/// `severity` is `None` for a category outside [`Severity`]; that line uses
/// `config.default_prefix` and `config.fallback_color`. With
/// `timestamp_enabled` the prefix becomes `"[<now>] <prefix>"`, rendered with
/// `config.timestamps.full`. A `None` message renders as an empty string. No
/// terminator is appended.
///
/// # Examples
///
/// ```
/// # use channel_logger::{format_line, LoggerConfig, Severity, StateMaps};
/// # use chrono::Local;
/// let line = format_line(
///     &StateMaps::new(),
///     &LoggerConfig::default(),
///     &Local::now(),
///     Some(Severity::Success),
///     false,
///     "L",
///     Some(&"started"),
/// );
/// assert_eq!(line.to_string(), "[+] [L] started");
/// ```
pub fn format_line(
    maps: &StateMaps,
    config: &LoggerConfig,
    now: &DateTime<Local>,
    severity: Option<Severity>,
    timestamp_enabled: bool,
    source: &str,
    message: Option<&dyn fmt::Display>,
) -> FormattedLine {
    let (state_prefix, color) = match severity {
        Some(severity) => maps.get(severity),
        None => (config.default_prefix.as_str(), config.fallback_color),
    };

    let prefix = if timestamp_enabled {
        format!("[{}] {}", config.timestamps.render_full(now), state_prefix)
    } else {
        state_prefix.to_string()
    };

    FormattedLine {
        prefix,
        source_tag: format!("[{}] ", source),
        message: message.map(|m| m.to_string()).unwrap_or_default(),
        color,
    }
}
