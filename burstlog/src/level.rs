//! Logging levels and filters.
//!
//! Six levels of increasing severity, each with the single-character tag
//! that appears in rendered records:
//!
//! | Level | Tag |
//! |---|---|
//! | [`Trace`] | `T` |
//! | [`Debug`] | `D` |
//! | [`Info`] | `I` |
//! | [`Warn`] | `W` |
//! | [`Error`] | `E` |
//! | [`Critical`] | `C` |
//!
//! [`LevelFilter`] is the admission floor configured on a logger: a record is
//! kept iff its level is at or above the floor, and the check runs before any
//! formatting work. `LevelFilter::Off` disables logging entirely.
//!
//! [`Trace`]: Level::Trace
//! [`Debug`]: Level::Debug
//! [`Info`]: Level::Info
//! [`Warn`]: Level::Warn
//! [`Error`]: Level::Error
//! [`Critical`]: Level::Critical

use thiserror::Error;

/// Severity of one record.
#[repr(u8)]
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Critical = 5,
}

impl Level {
    /// Single-character tag used in rendered records.
    pub const fn tag(self) -> char {
        match self {
            Level::Trace => 'T',
            Level::Debug => 'D',
            Level::Info => 'I',
            Level::Warn => 'W',
            Level::Error => 'E',
            Level::Critical => 'C',
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

/// Admission floor for a logger.
#[repr(u8)]
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd)]
pub enum LevelFilter {
    /// Keeps everything.
    Trace = 0,
    /// Keeps debug and above.
    Debug = 1,
    /// Keeps info and above.
    Info = 2,
    /// Keeps warn and above.
    Warn = 3,
    /// Keeps error and critical.
    Error = 4,
    /// Keeps critical only.
    Critical = 5,
    /// Disables all logging.
    Off = 6,
}

impl LevelFilter {
    /// Whether a record at `level` passes this floor.
    #[inline]
    pub const fn admits(self, level: Level) -> bool {
        level as u8 >= self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LevelFilter::Trace => "TRACE",
            LevelFilter::Debug => "DEBUG",
            LevelFilter::Info => "INFO",
            LevelFilter::Warn => "WARN",
            LevelFilter::Error => "ERROR",
            LevelFilter::Critical => "CRITICAL",
            LevelFilter::Off => "OFF",
        }
    }
}

impl std::fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Debug for LevelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized level filter")]
pub struct ParseLevelFilterError;

impl std::str::FromStr for LevelFilter {
    type Err = ParseLevelFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            "OFF" => Ok(Self::Off),
            _ => Err(ParseLevelFilterError),
        }
    }
}
