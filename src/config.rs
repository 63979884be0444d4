use std::fmt::Write as _;

use chrono::{DateTime, Local};
use crossterm::style::Color;

/// Source name used by static writes when the caller gives none.
pub const DEFAULT_SOURCE: &str = "Anonymous";
/// Prefix for a severity that is not part of [`Severity`](crate::Severity).
pub const DEFAULT_PREFIX: &str = "[?] ";

/// What binding a logger to an unknown channel name does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingChannelPolicy {
    /// The logger stays console-only.
    #[default]
    Lenient,
    /// Construction fails with [`LoggerError::NonExistingChannel`](crate::LoggerError::NonExistingChannel).
    Strict,
}

/// `chrono` strftime patterns for the three places a time is rendered.
///
/// Defaults follow the en-US conventions: a long date-time for line
/// timestamps, `M/d/yyyy` for `<Date>` and `h:mm AM` for `<Time>`. The slash
/// and colon those produce are replaced when a file name is sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    pub full: String,
    pub date: String,
    pub time: String,
}

impl TimestampFormat {
    pub fn render_full(&self, at: &DateTime<Local>) -> String {
        render(at, &self.full)
    }

    pub fn render_date(&self, at: &DateTime<Local>) -> String {
        render(at, &self.date)
    }

    pub fn render_time(&self, at: &DateTime<Local>) -> String {
        render(at, &self.time)
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            full: "%A, %B %-d, %Y %-I:%M:%S %p".to_string(),
            date: "%-m/%-d/%Y".to_string(),
            time: "%-I:%M %p".to_string(),
        }
    }
}

// An invalid pattern makes chrono's formatter return fmt::Error; fall back to
// RFC 3339 rather than panicking inside a log call.
fn render(at: &DateTime<Local>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(pattern)).is_err() {
        return at.to_rfc3339();
    }
    out
}

/// Process-wide settings read on every write.
///
/// # Examples
///
/// ```
/// # use channel_logger::{LoggerConfig, MissingChannelPolicy};
/// let config = LoggerConfig::default()
///     .with_default_source("Main")
///     .with_add_timestamp(false)
///     .with_missing_channel(MissingChannelPolicy::Strict);
/// assert_eq!(config.default_source, "Main");
/// assert_eq!(config.default_prefix, "[?] ");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    /// Source tag for static writes without an explicit source.
    pub default_source: String,
    /// Prefix for severities outside the known set.
    pub default_prefix: String,
    /// Color paired with `default_prefix`.
    pub fallback_color: Color,
    /// Timestamp flag for static writes and newly created loggers.
    pub add_timestamp: bool,
    pub missing_channel: MissingChannelPolicy,
    pub timestamps: TimestampFormat,
}

impl LoggerConfig {
    pub fn with_default_source(mut self, source: impl Into<String>) -> Self {
        self.default_source = source.into();
        self
    }

    pub fn with_default_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_prefix = prefix.into();
        self
    }

    pub fn with_fallback_color(mut self, color: Color) -> Self {
        self.fallback_color = color;
        self
    }

    pub fn with_add_timestamp(mut self, add_timestamp: bool) -> Self {
        self.add_timestamp = add_timestamp;
        self
    }

    pub fn with_missing_channel(mut self, policy: MissingChannelPolicy) -> Self {
        self.missing_channel = policy;
        self
    }

    pub fn with_timestamps(mut self, timestamps: TimestampFormat) -> Self {
        self.timestamps = timestamps;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            default_source: DEFAULT_SOURCE.to_string(),
            default_prefix: DEFAULT_PREFIX.to_string(),
            fallback_color: Color::DarkGrey,
            add_timestamp: true,
            missing_channel: MissingChannelPolicy::Lenient,
            timestamps: TimestampFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_patterns() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let formats = TimestampFormat::default();

        assert_eq!(formats.render_date(&at), "3/9/2024");
        assert_eq!(formats.render_time(&at), "2:05 PM");
        assert_eq!(formats.render_full(&at), "Saturday, March 9, 2024 2:05:07 PM");
    }

    #[test]
    fn test_invalid_pattern_does_not_panic() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let formats = TimestampFormat {
            full: "%Q".to_string(),
            ..TimestampFormat::default()
        };
        assert_eq!(formats.render_full(&at), at.to_rfc3339());
    }
}
