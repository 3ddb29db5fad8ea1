//! Timetable time handling.
//!
//! Timetable times are seconds from midnight on the service day. Overnight
//! services carry on past 86 400 rather than wrapping, so "01:30 the next
//! morning" is stored as `25:30:00` = 91 800 seconds. This keeps every time
//! in one scan totally ordered without tracking dates.

use std::fmt;
use std::ops::{Add, Sub};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct InvalidTime {
    reason: &'static str,
}

impl InvalidTime {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day as seconds from midnight, possibly beyond 24:00.
///
/// # Examples
///
/// ```
/// use journey_planner::domain::Time;
///
/// let t = Time::parse_hhmmss("10:15:30").unwrap();
/// assert_eq!(t.seconds(), 36930);
/// assert_eq!(t.to_string(), "10:15:30");
///
/// // Next-day arrivals use hours past 23
/// let late = Time::parse_hhmmss("25:30:00").unwrap();
/// assert_eq!(late.seconds(), 91800);
/// assert!(late > t);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(i32);

impl Time {
    /// Create a time from raw seconds since midnight.
    pub const fn from_seconds(seconds: i32) -> Self {
        Time(seconds)
    }

    /// Returns the raw seconds since midnight.
    pub const fn seconds(self) -> i32 {
        self.0
    }

    /// Parse a time from `HH:MM:SS` format.
    ///
    /// Hours may exceed 23 to represent times on the following day
    /// (`"25:30:00"` is half past one the next morning).
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_planner::domain::Time;
    ///
    /// assert!(Time::parse_hhmmss("00:00:00").is_ok());
    /// assert!(Time::parse_hhmmss("27:15:00").is_ok());
    ///
    /// assert!(Time::parse_hhmmss("10:60:00").is_err());
    /// assert!(Time::parse_hhmmss("10:00").is_err());
    /// ```
    pub fn parse_hhmmss(s: &str) -> Result<Self, InvalidTime> {
        let bytes = s.as_bytes();

        if bytes.len() != 8 {
            return Err(InvalidTime::new("expected HH:MM:SS format"));
        }
        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(InvalidTime::new("expected colons at positions 2 and 5"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| InvalidTime::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| InvalidTime::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(InvalidTime::new("minute must be 0-59"));
        }
        let second = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| InvalidTime::new("invalid second digits"))?;
        if second > 59 {
            return Err(InvalidTime::new("second must be 0-59"));
        }

        Ok(Time((hour * 3600 + minute * 60 + second) as i32))
    }

    /// Returns the hour component (may exceed 23).
    pub fn hour(self) -> i32 {
        self.0 / 3600
    }

    /// Returns the minute component (0-59).
    pub fn minute(self) -> i32 {
        (self.0 / 60) % 60
    }

    /// Returns the second component (0-59).
    pub fn second(self) -> i32 {
        self.0 % 60
    }

    /// Returns the signed number of seconds from `other` to `self`.
    pub fn seconds_since(self, other: Time) -> i32 {
        self.0 - other.0
    }
}

impl Add<i32> for Time {
    type Output = Time;

    /// Offset a time by a number of seconds.
    fn add(self, rhs: i32) -> Time {
        Time(self.0 + rhs)
    }
}

impl Sub<i32> for Time {
    type Output = Time;

    fn sub(self, rhs: i32) -> Time {
        Time(self.0 - rhs)
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time({self})")
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        assert_eq!(Time::parse_hhmmss("00:00:00").unwrap().seconds(), 0);
        assert_eq!(Time::parse_hhmmss("10:15:30").unwrap().seconds(), 36930);
        assert_eq!(Time::parse_hhmmss("23:59:59").unwrap().seconds(), 86399);
    }

    #[test]
    fn parse_next_day_hours() {
        let t = Time::parse_hhmmss("25:30:00").unwrap();
        assert_eq!(t.seconds(), 91800);
        assert_eq!(t.hour(), 25);
        assert!(t > Time::parse_hhmmss("23:59:59").unwrap());
    }

    #[test]
    fn parse_invalid_format() {
        assert!(Time::parse_hhmmss("10:00").is_err());
        assert!(Time::parse_hhmmss("10-00-00").is_err());
        assert!(Time::parse_hhmmss("1000:00").is_err());
        assert!(Time::parse_hhmmss("aa:bb:cc").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(Time::parse_hhmmss("10:60:00").is_err());
        assert!(Time::parse_hhmmss("10:00:61").is_err());
    }

    #[test]
    fn display_format() {
        assert_eq!(Time::from_seconds(0).to_string(), "00:00:00");
        assert_eq!(Time::from_seconds(36930).to_string(), "10:15:30");
        assert_eq!(Time::from_seconds(91800).to_string(), "25:30:00");
    }

    #[test]
    fn arithmetic() {
        let t = Time::from_seconds(1000);
        assert_eq!((t + 500).seconds(), 1500);
        assert_eq!((t - 500).seconds(), 500);
        assert_eq!((t + 500).seconds_since(t), 500);
        assert_eq!(t.seconds_since(t + 500), -500);
    }

    #[test]
    fn ordering() {
        let early = Time::from_seconds(1000);
        let late = Time::from_seconds(2000);
        assert!(early < late);
        assert_eq!(early.max(late), late);
    }
}
