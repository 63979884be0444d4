use chrono::{DateTime, Local};

/// Source of the local wall-clock time used for line timestamps and for
/// `<Date>` / `<Time>` expansion in channel file names.
///
/// Rendering is not the clock's job: patterns live in
/// [`TimestampFormat`](crate::config::TimestampFormat). Swapping the clock
/// lets tests pin the time.
///
/// # Examples
///
/// ```
/// # use channel_logger::clock::{Clock, FixedClock};
/// # use chrono::{Local, TimeZone};
/// let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
/// let clock = FixedClock::new(at);
/// assert_eq!(clock.now(), at);
/// ```
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the host's local time on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Local>,
}

impl FixedClock {
    pub const fn new(at: DateTime<Local>) -> Self {
        Self { at }
    }

    pub fn set(&mut self, at: DateTime<Local>) {
        self.at = at;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.at
    }
}
