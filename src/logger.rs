use std::fmt::{self, Display};
use std::path::PathBuf;
use std::sync::Arc;

use crate::channel::DEFAULT_SAFE_REPLACEMENT;
use crate::config::MissingChannelPolicy;
use crate::context::LogContext;
use crate::error::{LoggerError, Result};
use crate::state::Severity;

/// Parameters for a channel created together with a logger.
///
/// ```
/// # use channel_logger::ChannelOptions;
/// let options = ChannelOptions::new("app", "./logs", "run-<Date>.log").with_add_timestamp(false);
/// assert_eq!(options.safe_replacement, '-');
/// ```
#[derive(Debug, Clone)]
pub struct ChannelOptions {
    pub channel: String,
    pub directory: PathBuf,
    pub filename_format: String,
    pub add_timestamp: bool,
    pub safe_replacement: char,
}

impl ChannelOptions {
    pub fn new(channel: impl Into<String>, directory: impl Into<PathBuf>, filename_format: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            directory: directory.into(),
            filename_format: filename_format.into(),
            add_timestamp: true,
            safe_replacement: DEFAULT_SAFE_REPLACEMENT,
        }
    }

    pub fn with_add_timestamp(mut self, add_timestamp: bool) -> Self {
        self.add_timestamp = add_timestamp;
        self
    }

    pub fn with_safe_replacement(mut self, replacement: char) -> Self {
        self.safe_replacement = replacement;
        self
    }
}

/// A named source of log lines, optionally mirrored to one channel.
///
/// The logger only remembers the channel's name; the file belongs to the
/// context's [`ChannelRegistry`](crate::ChannelRegistry) and is looked up on
/// every write. Several loggers can share a channel, and once the channel is
/// stopped they all keep writing to the console only.
///
/// # Examples
///
/// ```
/// # use channel_logger::{ChannelOptions, Logger, Severity};
/// # let dir = tempfile::tempdir().unwrap();
/// let main = Logger::with_new_channel("Main", ChannelOptions::new("doc-main", dir.path(), "main.log"))?;
/// let worker = Logger::with_channel("Worker", "doc-main")?;
///
/// main.write_line("Initialized successfully", Severity::Success);
/// worker.write_line("Working", Severity::Info);
/// # channel_logger::LogContext::global().channels().stop_channel("doc-main");
/// # Ok::<(), channel_logger::LoggerError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    name: String,
    add_timestamp: bool,
    channel: Option<String>,
    context: Arc<LogContext>,
}

impl Logger {
    /// Console-only logger on the global context.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_context(LogContext::global(), name)
    }

    /// Console-only logger on `context`.
    pub fn with_context(context: Arc<LogContext>, name: impl Into<String>) -> Self {
        let add_timestamp = context.config().add_timestamp;
        Self {
            name: name.into(),
            add_timestamp,
            channel: None,
            context,
        }
    }

    /// Logger on the global context writing to a freshly opened channel.
    ///
    /// See [`bind_new_channel`](Self::bind_new_channel).
    pub fn with_new_channel(name: impl Into<String>, options: ChannelOptions) -> Result<Self> {
        Self::with_context(LogContext::global(), name).bind_new_channel(options)
    }

    /// Logger on the global context bound to an existing channel, following
    /// the context's [`MissingChannelPolicy`].
    pub fn with_channel(name: impl Into<String>, channel: &str) -> Result<Self> {
        let policy = LogContext::global().config().missing_channel;
        Self::attach(name, channel, policy)
    }

    /// Logger on the global context bound to an existing channel with an
    /// explicit policy for a missing one.
    pub fn attach(name: impl Into<String>, channel: &str, policy: MissingChannelPolicy) -> Result<Self> {
        Self::with_context(LogContext::global(), name).bind_channel(channel, policy)
    }

    /// Opens `options.channel` and binds to it.
    ///
    /// If a channel of that name is already open the logger binds to it and
    /// the directory and format are ignored.
    ///
    /// # Errors
    ///
    /// [`LoggerError::Io`] when the directory or file cannot be created.
    pub fn bind_new_channel(mut self, options: ChannelOptions) -> Result<Self> {
        let opened = self.context.begin_channel(
            &options.channel,
            &options.directory,
            &options.filename_format,
            options.safe_replacement,
        )?;
        if !opened {
            log::debug!("channel '{}' already open, '{}' shares it", options.channel, self.name);
        }

        self.add_timestamp = options.add_timestamp;
        self.channel = Some(options.channel);
        Ok(self)
    }

    /// Binds to an already open channel.
    ///
    /// A missing channel leaves the logger console-only under
    /// [`MissingChannelPolicy::Lenient`].
    ///
    /// # Errors
    ///
    /// [`LoggerError::NonExistingChannel`] when the channel is missing and
    /// `policy` is [`MissingChannelPolicy::Strict`].
    pub fn bind_channel(mut self, channel: &str, policy: MissingChannelPolicy) -> Result<Self> {
        if self.context.channels().channel_exists(channel) {
            self.channel = Some(channel.to_string());
            return Ok(self);
        }

        match policy {
            MissingChannelPolicy::Strict => Err(LoggerError::NonExistingChannel(channel.to_string())),
            MissingChannelPolicy::Lenient => Ok(self),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn add_timestamp(&self) -> bool {
        self.add_timestamp
    }

    pub fn set_add_timestamp(&mut self, add_timestamp: bool) {
        self.add_timestamp = add_timestamp;
    }

    /// Name of the bound channel.
    pub fn channel_name(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn context(&self) -> &Arc<LogContext> {
        &self.context
    }

    /// Stops the bound channel for every logger sharing it, then unbinds.
    ///
    /// Returns true if a channel was stopped.
    pub fn stop_logging_to_file(&mut self) -> bool {
        match self.channel.take() {
            Some(channel) => self.context.channels().stop_channel(&channel),
            None => false,
        }
    }

    /// Writes a full line to the console and mirrors it to the channel.
    ///
    /// `severity` accepts a [`Severity`] or an `Option<Severity>`; `None`
    /// renders with the configured fallback prefix.
    pub fn write_line(&self, message: impl Display, severity: impl Into<Option<Severity>>) {
        let line = self
            .context
            .format(severity.into(), self.add_timestamp, &self.name, Some(&message))
            .terminated();
        self.mirror(&self.context.emit(&line));
    }

    /// Like [`write_line`](Self::write_line) without the terminator.
    pub fn write(&self, message: impl Display, severity: impl Into<Option<Severity>>) {
        let line = self
            .context
            .format(severity.into(), self.add_timestamp, &self.name, Some(&message));
        self.mirror(&self.context.emit(&line));
    }

    fn mirror(&self, text: &str) {
        if let Some(channel) = &self.channel {
            self.context.channels().write(channel, text);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("add_timestamp", &self.add_timestamp)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
