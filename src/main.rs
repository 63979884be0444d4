use channel_logger::{Color, Logger, Severity};

fn main() {
    let main_log = Logger::new("Main");
    main_log.write_line("Initialized successfully", Severity::Success);
    main_log.write_line("Launching work()...", Severity::Unimportant);

    if let Err(e) = work() {
        main_log.write_line(e, Severity::Error);
    }

    channel_logger::skip_line();
    channel_logger::raw_line("done", Color::DarkGrey);
}

fn work() -> Result<(), String> {
    let work_log = Logger::new("Work");
    work_log.write_line("Work is working", Severity::Success);
    work_log.write_line("Work is doing something risky", Severity::Warning);
    Err("Something went wrong".to_string())
}
