use channel_logger::clock::FixedClock;
use channel_logger::{
    format_line, Color, ConsoleSink, ConsoleWriter, LogContext, LoggerConfig, Severity, StateMaps,
};
use chrono::{Local, TimeZone};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct CollectingSink {
    data: Arc<Mutex<Vec<u8>>>,
}

impl Write for CollectingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_every_severity_formats_with_its_default() {
    let maps = StateMaps::new();
    let config = LoggerConfig::default();
    let now = Local::now();

    for severity in Severity::ALL {
        let line = format_line(&maps, &config, &now, Some(severity), false, "S", Some(&"m"));
        let (prefix, color) = maps.get(severity);
        assert_eq!(line.prefix, prefix);
        assert_eq!(line.color, color);
        assert_eq!(line.to_string(), format!("{}[S] m", prefix));
    }
}

#[test]
fn test_prefix_override_sticks_for_later_formats() {
    let sink = CollectingSink::default();
    let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    let context = LogContext::new(ConsoleWriter::new(Box::new(sink) as ConsoleSink).with_colors(false))
        .with_clock(FixedClock::new(at));

    context.set_state_prefix(Severity::Warning, "WARN ");
    context.set_state_color(Severity::Warning, Color::Magenta);

    for _ in 0..3 {
        let line = context.format(Some(Severity::Warning), false, "S", Some(&"m"));
        assert_eq!(line.to_string(), "WARN [S] m");
        assert_eq!(line.color, Color::Magenta);
    }
    let other = context.format(Some(Severity::Info), false, "S", Some(&"m"));
    assert_eq!(other.to_string(), "[i] [S] m");

    context.reset_states();
    assert_eq!(context.maps(), StateMaps::default());
}

#[test]
fn test_custom_table_via_builder() {
    let mut maps = StateMaps::new();
    maps.set_prefix(Severity::Error, "E: ");
    let context = LogContext::new(ConsoleWriter::new(Box::new(io::sink()) as ConsoleSink)).with_maps(maps);

    let line = context.format(Some(Severity::Error), false, "S", None);
    assert_eq!(line.to_string(), "E: [S] ");
}

#[test]
fn test_global_setters() {
    let global = LogContext::global();

    channel_logger::set_state_prefix(Severity::Unimportant, "... ");
    channel_logger::set_state_color(Severity::Unimportant, Color::Grey);
    assert_eq!(global.maps().get(Severity::Unimportant), ("... ", Color::Grey));

    channel_logger::configure(|c| c.default_source = "Global".to_string());
    assert_eq!(global.config().default_source, "Global");

    assert!(!channel_logger::timestamp().is_empty());

    global.reset_states();
    channel_logger::configure(|c| *c = LoggerConfig::default());
    assert_eq!(global.maps(), StateMaps::default());
}
