use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MosqueError, Result};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time of day with minute precision.
///
/// Stored by the mosque documents as two separate integer fields, which is why
/// it serializes as `{ "hours": h, "minutes": m }` rather than a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTime")]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
}

#[derive(Deserialize)]
struct RawTime {
    hours: i64,
    minutes: i64,
}

impl TryFrom<RawTime> for TimeOfDay {
    type Error = MosqueError;

    fn try_from(raw: RawTime) -> Result<Self> {
        if !(0..=23).contains(&raw.hours) || !(0..=59).contains(&raw.minutes) {
            return Err(MosqueError::validation(format!(
                "time {}:{} is out of range",
                raw.hours, raw.minutes
            )));
        }
        Ok(Self {
            hours: raw.hours as u8,
            minutes: raw.minutes as u8,
        })
    }
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hours: 0, minutes: 0 };
    pub const END_OF_DAY: TimeOfDay = TimeOfDay { hours: 23, minutes: 59 };

    pub fn new(hours: u8, minutes: u8) -> Result<Self> {
        if hours > 23 {
            return Err(MosqueError::validation(format!("hour {} is out of range 0-23", hours)));
        }
        if minutes > 59 {
            return Err(MosqueError::validation(format!(
                "minute {} is out of range 0-59",
                minutes
            )));
        }
        Ok(Self { hours, minutes })
    }

    pub fn minute_of_day(&self) -> u32 {
        self.hours as u32 * 60 + self.minutes as u32
    }

    /// Inverse of [`minute_of_day`](Self::minute_of_day); wraps past midnight.
    pub fn from_minute_of_day(minutes: u32) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self {
            hours: (minutes / 60) as u8,
            minutes: (minutes % 60) as u8,
        }
    }

    pub fn to_naive(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hours as u32, self.minutes as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(t: NaiveTime) -> Self {
        Self {
            hours: t.hour() as u8,
            minutes: t.minute() as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Accepts `H:MM` or `HH:MM`.
impl FromStr for TimeOfDay {
    type Err = MosqueError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || MosqueError::validation(format!("'{}' is not a valid HH:MM time", s));

        let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(h) || h.len() > 2 || !all_digits(m) || m.len() != 2 {
            return Err(bad());
        }

        let hours: u8 = h.parse().map_err(|_| bad())?;
        let minutes: u8 = m.parse().map_err(|_| bad())?;
        Self::new(hours, minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_hours() {
        assert_eq!("04:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(4, 0).unwrap());
        assert_eq!("4:05".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(4, 5).unwrap());
        assert_eq!("23:59".parse::<TimeOfDay>().unwrap(), TimeOfDay::END_OF_DAY);
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in ["", "12", "24:00", "12:60", "12:5", "ab:cd", "-1:30", "12:30:00", "123:00"] {
            let err = input.parse::<TimeOfDay>().unwrap_err();
            assert!(err.is_validation(), "{input} should be a validation error");
        }
    }

    #[test]
    fn displays_zero_padded() {
        assert_eq!(TimeOfDay::new(5, 7).unwrap().to_string(), "05:07");
    }

    #[test]
    fn deserialization_enforces_ranges() {
        let ok: TimeOfDay = serde_json::from_str(r#"{"hours":13,"minutes":30}"#).unwrap();
        assert_eq!(ok, TimeOfDay::new(13, 30).unwrap());

        assert!(serde_json::from_str::<TimeOfDay>(r#"{"hours":24,"minutes":0}"#).is_err());
        assert!(serde_json::from_str::<TimeOfDay>(r#"{"hours":1,"minutes":-1}"#).is_err());
    }

    #[test]
    fn minute_of_day_wraps() {
        assert_eq!(TimeOfDay::from_minute_of_day(25 * 60 + 5), TimeOfDay::new(1, 5).unwrap());
        assert_eq!(TimeOfDay::new(1, 5).unwrap().minute_of_day(), 65);
    }
}
