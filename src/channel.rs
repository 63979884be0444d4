use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::{Mutex, RwLock};

use crate::config::TimestampFormat;

/// Characters that may not appear in a file name on Windows.
pub const UNSAFE_FILE_CHARS: [char; 9] = ['/', '\\', ':', '?', '*', '"', '<', '>', '|'];

/// Replacement used by callers that do not pick their own.
pub const DEFAULT_SAFE_REPLACEMENT: char = '-';

/// Replaces every character of [`UNSAFE_FILE_CHARS`] with `replacement`.
///
/// ```
/// # use channel_logger::channel::windows_safe_name;
/// assert_eq!(windows_safe_name("a/b\\c:d?e*f\"g<h>i|j", '-'), "a-b-c-d-e-f-g-h-i-j");
/// ```
pub fn windows_safe_name(input: &str, replacement: char) -> String {
    input
        .chars()
        .map(|c| if UNSAFE_FILE_CHARS.contains(&c) { replacement } else { c })
        .collect()
}

/// Expands `<Date>` and `<Time>` in a file name format using `now`.
///
/// The result is not sanitized; [`ChannelRegistry::begin_channel`] does that
/// after expansion.
pub fn expand_file_format(format: &str, now: &DateTime<Local>, patterns: &TimestampFormat) -> String {
    let mut expanded = format.to_string();
    if expanded.contains("<Date>") {
        expanded = expanded.replace("<Date>", &patterns.render_date(now));
    }
    if expanded.contains("<Time>") {
        expanded = expanded.replace("<Time>", &patterns.render_time(now));
    }
    expanded
}

/// One open log file.
///
/// The handle sits behind its own lock so that loggers sharing the channel
/// never interleave bytes within a write. `None` means the file was closed
/// by [`ChannelRegistry::close_all`] while the entry stayed registered.
struct Channel {
    path: PathBuf,
    file: Mutex<Option<BufWriter<File>>>,
}

impl Channel {
    fn open(path: PathBuf) -> io::Result<Self> {
        // Truncates any earlier run's file of the same resolved name.
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    fn append(&self, text: &str) -> io::Result<()> {
        let mut file = self.file.lock();
        if let Some(writer) = file.as_mut() {
            writer.write_all(text.as_bytes())?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Flushes and drops the handle. Returns false if it was already closed.
    fn close(&self) -> io::Result<bool> {
        match self.file.lock().take() {
            Some(mut writer) => {
                writer.flush()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Registry of named log files ("channels").
///
/// A channel is created once by name with [`begin_channel`](Self::begin_channel),
/// written to any number of times by any number of loggers, and closed either
/// with [`stop_channel`](Self::stop_channel) or by the [`ShutdownGuard`].
/// Writing to a name that is not registered does nothing, so a logger whose
/// channel was stopped degrades to console-only output.
///
/// # Thread Safety
///
/// The name map is guarded by one mutex, each file by another. A write holds
/// the map lock only long enough to clone the channel handle.
///
/// # Examples
///
/// ```
/// # use channel_logger::ChannelRegistry;
/// # let dir = tempfile::tempdir().unwrap();
/// let registry = ChannelRegistry::new();
/// assert!(registry.begin_channel("app", dir.path(), "run.log", '-').unwrap());
/// assert!(!registry.begin_channel("app", dir.path(), "other.log", '-').unwrap());
///
/// registry.write("app", "hello\n");
/// assert!(registry.stop_channel("app"));
/// assert_eq!(std::fs::read_to_string(dir.path().join("run.log")).unwrap(), "hello\n");
/// ```
pub struct ChannelRegistry {
    channels: Mutex<HashMap<String, Arc<Channel>>>,
    patterns: RwLock<TimestampFormat>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::with_patterns(TimestampFormat::default())
    }

    /// Registry whose `<Date>` / `<Time>` expansion uses `patterns`.
    pub fn with_patterns(patterns: TimestampFormat) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            patterns: RwLock::new(patterns),
        }
    }

    /// Replaces the `<Date>` / `<Time>` patterns for channels opened later.
    pub fn set_patterns(&self, patterns: TimestampFormat) {
        *self.patterns.write() = patterns;
    }

    /// Opens a new channel, expanding the file name against the local time.
    ///
    /// See [`begin_channel_at`](Self::begin_channel_at).
    pub fn begin_channel(
        &self,
        name: &str,
        directory: impl AsRef<Path>,
        filename_format: &str,
        safe_replacement: char,
    ) -> io::Result<bool> {
        self.begin_channel_at(name, directory, filename_format, safe_replacement, &Local::now())
    }

    /// Opens a new channel named `name`.
    ///
    /// Returns `Ok(false)` without touching the filesystem if the name is
    /// taken. Otherwise creates `directory` if needed, expands `<Date>` and
    /// `<Time>` in `filename_format` with `now`, replaces unsafe characters
    /// with `safe_replacement`, and creates (or truncates) the file.
    ///
    /// # Errors
    ///
    /// Any error creating the directory or opening the file.
    pub fn begin_channel_at(
        &self,
        name: &str,
        directory: impl AsRef<Path>,
        filename_format: &str,
        safe_replacement: char,
        now: &DateTime<Local>,
    ) -> io::Result<bool> {
        let mut channels = self.channels.lock();
        if channels.contains_key(name) {
            return Ok(false);
        }

        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;

        let file_name = windows_safe_name(
            &expand_file_format(filename_format, now, &self.patterns.read()),
            safe_replacement,
        );
        let channel = Channel::open(directory.join(file_name))?;
        log::debug!("channel '{}' opened at {}", name, channel.path.display());

        channels.insert(name.to_string(), Arc::new(channel));
        Ok(true)
    }

    pub fn channel_exists(&self, name: &str) -> bool {
        self.channels.lock().contains_key(name)
    }

    /// Path of the file behind `name`, if registered.
    pub fn channel_path(&self, name: &str) -> Option<PathBuf> {
        self.channels.lock().get(name).map(|c| c.path.clone())
    }

    /// Registered channel names, sorted.
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Appends `text` to the channel and flushes.
    ///
    /// Unknown or closed channels are ignored. I/O failures are reported
    /// through `log` and otherwise swallowed.
    pub fn write(&self, name: &str, text: &str) {
        let channel = match self.channels.lock().get(name) {
            Some(channel) => Arc::clone(channel),
            None => return,
        };

        if let Err(e) = channel.append(text) {
            log::warn!("write to channel '{}' failed: {}", name, e);
        }
    }

    /// Flushes, closes and unregisters `name`. Returns false if not registered.
    pub fn stop_channel(&self, name: &str) -> bool {
        let channel = match self.channels.lock().remove(name) {
            Some(channel) => channel,
            None => return false,
        };

        if let Err(e) = channel.close() {
            log::warn!("closing channel '{}' failed: {}", name, e);
        }
        log::debug!("channel '{}' stopped", name);
        true
    }

    /// Flushes and closes every channel, leaving the names registered.
    ///
    /// Returns how many files were open.
    pub fn close_all(&self) -> usize {
        let channels: Vec<(String, Arc<Channel>)> = self
            .channels
            .lock()
            .iter()
            .map(|(name, channel)| (name.clone(), Arc::clone(channel)))
            .collect();

        let mut closed = 0;
        for (name, channel) in channels {
            match channel.close() {
                Ok(true) => closed += 1,
                Ok(false) => {}
                Err(e) => log::warn!("closing channel '{}' failed: {}", name, e),
            }
        }
        log::debug!("closed {} channel(s)", closed);
        closed
    }

    /// Returns a guard that closes every channel when released or dropped.
    pub fn shutdown_guard(&self) -> ShutdownGuard<'_> {
        ShutdownGuard {
            registry: self,
            released: false,
        }
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Closes all channels of a registry on release or drop, whichever comes first.
///
/// Hold it for the lifetime of `main` so open files are flushed on every
/// exit path:
///
/// ```
/// # use channel_logger::ChannelRegistry;
/// # let dir = tempfile::tempdir().unwrap();
/// let registry = ChannelRegistry::new();
/// {
///     let _guard = registry.shutdown_guard();
///     registry.begin_channel("app", dir.path(), "run.log", '-').unwrap();
///     registry.write("app", "bye\n");
/// }
/// // The channel is still registered but its file is closed.
/// assert!(registry.channel_exists("app"));
/// ```
#[must_use = "dropping the guard immediately closes every channel"]
pub struct ShutdownGuard<'a> {
    registry: &'a ChannelRegistry,
    released: bool,
}

impl ShutdownGuard<'_> {
    /// Closes every channel now. Returns how many files were open.
    pub fn release(mut self) -> usize {
        self.released = true;
        self.registry.close_all()
    }
}

impl Drop for ShutdownGuard<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.registry.close_all();
        }
    }
}
