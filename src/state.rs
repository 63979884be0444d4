use std::fmt;
use std::str::FromStr;

use crossterm::style::Color;

/// Category of a log line.
///
/// Every severity owns exactly one prefix and one console color, looked up
/// through [`StateMaps`]. The set is closed; severities that arrive from
/// outside the program (by name or by index) go through [`Severity::from_str`]
/// or [`Severity::from_index`], and a miss there is represented as `None`
/// which the formatter renders with the configured fallback prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Log,
    Unimportant,
    Error,
    Warning,
    Success,
    Info,
}

impl Severity {
    /// All severities, in declaration order.
    pub const ALL: [Severity; 6] = [
        Severity::Log,
        Severity::Unimportant,
        Severity::Error,
        Severity::Warning,
        Severity::Success,
        Severity::Info,
    ];

    /// Maps a declaration index back to a severity.
    ///
    /// ```
    /// # use channel_logger::Severity;
    /// assert_eq!(Severity::from_index(4), Some(Severity::Success));
    /// assert_eq!(Severity::from_index(42), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Severity> {
        Self::ALL.get(index).copied()
    }

    fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Log => "Log",
            Severity::Unimportant => "Unimportant",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Success => "Success",
            Severity::Info => "Info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a severity name does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity: {0}")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    /// Case-insensitive match on the variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|severity| severity.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

/// Prefix and color assigned to every [`Severity`].
///
/// Storage is a fixed array indexed by the severity, so a lookup can never
/// miss. Built-in defaults:
///
/// | Severity    | Prefix | Color    |
/// |-------------|--------|----------|
/// | Log         | `[*] ` | White    |
/// | Error       | `[X] ` | Red      |
/// | Warning     | `[!] ` | Yellow   |
/// | Success     | `[+] ` | Green    |
/// | Info        | `[i] ` | Cyan     |
/// | Unimportant | `[-] ` | DarkGrey |
#[derive(Debug, Clone, PartialEq)]
pub struct StateMaps {
    prefixes: [String; 6],
    colors: [Color; 6],
}

impl StateMaps {
    pub fn new() -> Self {
        let mut maps = Self {
            prefixes: Default::default(),
            colors: [Color::White; 6],
        };
        for severity in Severity::ALL {
            maps.prefixes[severity.slot()] = default_prefix(severity).to_string();
            maps.colors[severity.slot()] = default_color(severity);
        }
        maps
    }

    pub fn prefix(&self, severity: Severity) -> &str {
        &self.prefixes[severity.slot()]
    }

    pub fn color(&self, severity: Severity) -> Color {
        self.colors[severity.slot()]
    }

    /// Returns `(prefix, color)` for one severity.
    pub fn get(&self, severity: Severity) -> (&str, Color) {
        (self.prefix(severity), self.color(severity))
    }

    pub fn set_prefix(&mut self, severity: Severity, prefix: impl Into<String>) {
        self.prefixes[severity.slot()] = prefix.into();
    }

    pub fn set_color(&mut self, severity: Severity, color: Color) {
        self.colors[severity.slot()] = color;
    }

    /// Restores the built-in table.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for StateMaps {
    fn default() -> Self {
        Self::new()
    }
}

fn default_prefix(severity: Severity) -> &'static str {
    match severity {
        Severity::Log => "[*] ",
        Severity::Error => "[X] ",
        Severity::Warning => "[!] ",
        Severity::Success => "[+] ",
        Severity::Info => "[i] ",
        Severity::Unimportant => "[-] ",
    }
}

fn default_color(severity: Severity) -> Color {
    match severity {
        Severity::Log => Color::White,
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Success => Color::Green,
        Severity::Info => Color::Cyan,
        Severity::Unimportant => Color::DarkGrey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let maps = StateMaps::new();
        assert_eq!(maps.get(Severity::Log), ("[*] ", Color::White));
        assert_eq!(maps.get(Severity::Error), ("[X] ", Color::Red));
        assert_eq!(maps.get(Severity::Warning), ("[!] ", Color::Yellow));
        assert_eq!(maps.get(Severity::Success), ("[+] ", Color::Green));
        assert_eq!(maps.get(Severity::Info), ("[i] ", Color::Cyan));
        assert_eq!(maps.get(Severity::Unimportant), ("[-] ", Color::DarkGrey));
    }

    #[test]
    fn test_override_only_touches_one_severity() {
        let mut maps = StateMaps::new();
        maps.set_prefix(Severity::Info, ">> ");
        maps.set_color(Severity::Info, Color::Magenta);

        assert_eq!(maps.get(Severity::Info), (">> ", Color::Magenta));
        assert_eq!(maps.get(Severity::Log), ("[*] ", Color::White));

        maps.reset();
        assert_eq!(maps, StateMaps::default());
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!("success".parse::<Severity>(), Ok(Severity::Success));
        assert_eq!(" Warning ".parse::<Severity>(), Ok(Severity::Warning));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_index_round_trip() {
        for (index, severity) in Severity::ALL.iter().enumerate() {
            assert_eq!(Severity::from_index(index), Some(*severity));
        }
        assert_eq!(Severity::from_index(Severity::ALL.len()), None);
    }
}
