use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

/// A wall-clock time of day at minute granularity, stored as minutes since midnight.
///
/// Values are parsed strictly from zero-padded 24-hour `HH:MM` strings. Generated
/// slots may run past midnight, in which case the rendered hour is 24 or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(u32);

impl SlotTime {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }

    pub const fn plus_minutes(self, minutes: u32) -> Self {
        Self(self.0 + minutes)
    }

    /// Parses a zero-padded `HH:MM` time (hour 00-23, minute 00-59).
    pub fn parse(value: &str) -> BookingResult<Self> {
        let invalid = || {
            BookingError::Validation(format!(
                "Invalid time '{}': expected HH:MM (00:00-23:59)",
                value
            ))
        };

        let bytes = value.as_bytes();
        let padded = bytes.len() == 5
            && bytes[2] == b':'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || b.is_ascii_digit());
        if !padded {
            return Err(invalid());
        }

        let time = NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| invalid())?;
        Ok(Self(time.num_seconds_from_midnight() / 60))
    }

    /// Like [`SlotTime::parse`], but also accepts hours of 24 and above, which
    /// generated slots use once they run past midnight.
    fn parse_extended(value: &str) -> BookingResult<Self> {
        let invalid = || BookingError::Validation(format!("Invalid time '{}'", value));

        let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
        if hours.len() < 2 || !hours.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hours: u32 = hours.parse().map_err(|_| invalid())?;
        if hours < 24 {
            return Self::parse(value).map_err(|_| invalid());
        }

        let minutes = Self::parse(&format!("00:{}", minutes))
            .map_err(|_| invalid())?
            .minutes();
        hours
            .checked_mul(60)
            .and_then(|total| total.checked_add(minutes))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for SlotTime {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SlotTime {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_extended(&value)
    }
}

impl From<SlotTime> for String {
    fn from(value: SlotTime) -> Self {
        value.to_string()
    }
}

/// Length of every slot in a generated day. Only multiples of ten up to an hour are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlotDuration(u32);

impl SlotDuration {
    pub const ALLOWED: [u32; 6] = [10, 20, 30, 40, 50, 60];

    pub const fn minutes(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SlotDuration {
    type Error = BookingError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(BookingError::Validation(format!(
                "Invalid duration {} minutes: must be one of {:?}",
                minutes,
                Self::ALLOWED
            )))
        }
    }
}

impl From<SlotDuration> for u32 {
    fn from(value: SlotDuration) -> Self {
        value.0
    }
}
