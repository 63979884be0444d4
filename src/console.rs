use std::io::{self, IsTerminal, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use parking_lot::Mutex;

/// Boxed console sink stored in a [`LogContext`](crate::LogContext).
pub type ConsoleSink = Box<dyn Write + Send>;

/// Single-writer console.
///
/// Every write takes one lock for its whole duration, so two threads never
/// interleave characters, and the foreground color is always reset before
/// the lock is released. Output errors are ignored: a broken console must
/// not take the host application down.
///
/// # Examples
///
/// ```
/// # use channel_logger::ConsoleWriter;
/// # use crossterm::style::Color;
/// let console = ConsoleWriter::new(Vec::new()).with_colors(false);
/// let written = console.raw_write("[+] ", "[Main] ", "ready\n", Color::Green);
/// assert_eq!(written, "[+] [Main] ready\n");
/// assert_eq!(console.into_inner(), b"[+] [Main] ready\n");
/// ```
pub struct ConsoleWriter<W: Write> {
    out: Mutex<W>,
    colors: bool,
}

impl<W: Write> ConsoleWriter<W> {
    /// Wraps `out` with coloring enabled.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            colors: true,
        }
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    /// Writes `prefix + source_tag + message` in `color` and returns exactly
    /// that string. No line terminator is added.
    pub fn raw_write(&self, prefix: &str, source_tag: &str, message: &str, color: Color) -> String {
        let mut text = String::with_capacity(prefix.len() + source_tag.len() + message.len());
        text.push_str(prefix);
        text.push_str(source_tag);
        text.push_str(message);

        let mut out = self.out.lock();
        let mut painted = Painted::begin(&mut *out, color, self.colors);
        painted.print(&text);
        drop(painted);

        text
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl ConsoleWriter<ConsoleSink> {
    /// Console on standard output; colors only when stdout is a terminal.
    pub fn stdout() -> Self {
        let colors = io::stdout().is_terminal();
        Self::new(Box::new(io::stdout()) as ConsoleSink).with_colors(colors)
    }
}

/// Foreground color held for the duration of one write.
///
/// The reset runs from `Drop`, so it also happens if printing panics.
struct Painted<'a, W: Write> {
    out: &'a mut W,
    colored: bool,
}

impl<'a, W: Write> Painted<'a, W> {
    fn begin(out: &'a mut W, color: Color, colored: bool) -> Self {
        if colored {
            let _ = queue!(out, SetForegroundColor(color));
        }
        Self { out, colored }
    }

    fn print(&mut self, text: &str) {
        let _ = queue!(self.out, Print(text));
    }
}

impl<W: Write> Drop for Painted<'_, W> {
    fn drop(&mut self) {
        if self.colored {
            let _ = queue!(self.out, ResetColor);
        }
        let _ = self.out.flush();
    }
}
