use channel_logger::{Color, ConsoleSink, ConsoleWriter, LogContext, Logger, Severity, LINE_ENDING};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;

const RESET: &str = "\x1b[0m";

/// Sink that writes one byte per call, so any missing lock shows up as
/// interleaved characters.
#[derive(Clone, Default)]
struct TrickleSink {
    data: Arc<Mutex<Vec<u8>>>,
}

impl TrickleSink {
    fn contents(&self) -> String {
        String::from_utf8(self.data.lock().unwrap().clone()).unwrap()
    }
}

impl Write for TrickleSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match buf.first() {
            Some(b) => {
                self.data.lock().unwrap().push(*b);
                thread::yield_now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console gone"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console gone"))
    }
}

#[test]
fn test_concurrent_lines_are_not_interleaved() {
    const THREADS: usize = 6;
    const LINES: usize = 50;

    let sink = TrickleSink::default();
    let console = ConsoleWriter::new(Box::new(sink.clone()) as ConsoleSink).with_colors(false);
    let context = Arc::new(LogContext::new(console));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let mut logger = Logger::with_context(Arc::clone(&context), format!("T{}", t));
            logger.set_add_timestamp(false);
            thread::spawn(move || {
                for i in 0..LINES {
                    logger.write_line(format!("message {}", i), Severity::Log);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let output = sink.contents();
    let lines: Vec<&str> = output.split(LINE_ENDING).filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), THREADS * LINES);

    let mut expected = HashSet::new();
    for t in 0..THREADS {
        for i in 0..LINES {
            expected.insert(format!("[*] [T{}] message {}", t, i));
        }
    }
    let seen: HashSet<String> = lines.iter().map(|l| l.to_string()).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_every_colored_write_is_reset() {
    const THREADS: usize = 4;
    const WRITES: usize = 40;

    let sink = TrickleSink::default();
    let console = Arc::new(ConsoleWriter::new(sink.clone()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let console = Arc::clone(&console);
            let color = [Color::Red, Color::Green, Color::Yellow, Color::Cyan][t];
            thread::spawn(move || {
                for i in 0..WRITES {
                    console.raw_write("[c] ", &format!("[{}] ", t), &format!("{}\n", i), color);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let output = sink.contents();
    assert!(output.ends_with(RESET));

    let segments: Vec<&str> = output.split(RESET).filter(|s| !s.is_empty()).collect();
    assert_eq!(segments.len(), THREADS * WRITES);
    for segment in segments {
        // One color escape, then one complete write.
        assert!(segment.starts_with("\x1b["), "Segment without color: {:?}", segment);
        let text_at = segment.find("[c] ").expect("prefix missing");
        assert_eq!(segment[..text_at].matches('\x1b').count(), 1);
        assert!(segment.ends_with('\n'));
    }
}

#[test]
fn test_returns_exact_text() {
    let console = ConsoleWriter::new(Vec::new());
    let text = console.raw_write("[!] ", "[Src] ", "careful", Color::Yellow);
    assert_eq!(text, "[!] [Src] careful");
    assert!(console.colors());
}

#[test]
fn test_broken_console_does_not_panic() {
    let console = ConsoleWriter::new(Box::new(FailingSink) as ConsoleSink);
    let context = LogContext::new(console);

    assert_eq!(context.console().raw_write("a", "b", "c", Color::Red), "abc");
    context.write_line("still fine", None, Severity::Error);
    context.skip_line();
}
