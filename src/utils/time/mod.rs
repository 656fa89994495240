// Time slot math
// Conversions between wall-clock HH:MM strings and slot offsets on the day grid

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Errors raised while interpreting wall-clock times.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("malformed time '{0}', expected HH:MM")]
    Malformed(String),
    #[error("time '{0}' is outside the day")]
    OutOfRange(String),
    #[error("slot granularity must be positive, got {0}")]
    InvalidSlot(u32),
}

/// Parse a strict `HH:MM` string (one or two hour digits, exactly two minute digits).
///
/// # Examples
/// ```
/// use salon_scheduler::utils::time::parse_hhmm;
///
/// let time = parse_hhmm("09:45").unwrap();
/// assert_eq!(time.to_string(), "09:45:00");
/// assert!(parse_hhmm("9h45").is_err());
/// ```
pub fn parse_hhmm(input: &str) -> Result<NaiveTime, TimeError> {
    let malformed = || TimeError::Malformed(input.to_string());

    let (hours, minutes) = input.trim().split_once(':').ok_or_else(malformed)?;
    if hours.is_empty()
        || hours.len() > 2
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }

    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;

    NaiveTime::from_hms_opt(hours, minutes, 0)
        .ok_or_else(|| TimeError::OutOfRange(input.to_string()))
}

/// Format a time as zero-padded `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Whole minutes since midnight.
pub fn minutes_from_midnight(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Build a time from minutes since midnight. Only `0..1440` is representable.
pub fn time_from_minutes(minutes: i32) -> Result<NaiveTime, TimeError> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return Err(TimeError::OutOfRange(format!("{} min", minutes)));
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
        .ok_or_else(|| TimeError::OutOfRange(format!("{} min", minutes)))
}

/// Signed number of slots (fractional when off-grid) between `start_hour:00` and `time`.
pub fn time_to_slot_offset(time: &str, start_hour: u32, slot_minutes: u32) -> Result<f64, TimeError> {
    if slot_minutes == 0 {
        return Err(TimeError::InvalidSlot(slot_minutes));
    }
    let parsed = parse_hhmm(time)?;
    let delta = minutes_from_midnight(parsed) - (start_hour as i32) * 60;
    Ok(delta as f64 / slot_minutes as f64)
}

/// Inverse of [`time_to_slot_offset`] for whole slots; wraps around midnight.
pub fn slot_offset_to_time(offset: i32, start_hour: u32, slot_minutes: u32) -> String {
    let total = ((start_hour as i32) * 60 + offset * slot_minutes as i32).rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Standard three-argument clamp that also works for floats.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Advance `minutes` to the next grid line counted from `origin` (no-op when already on one).
pub fn snap_up(minutes: i32, origin: i32, slot_minutes: i32) -> i32 {
    if slot_minutes <= 0 {
        return minutes;
    }
    let rem = (minutes - origin).rem_euclid(slot_minutes);
    if rem == 0 {
        minutes
    } else {
        minutes + (slot_minutes - rem)
    }
}

/// Snap `minutes` to the closest grid line counted from `origin`; ties round up.
pub fn snap_nearest(minutes: i32, origin: i32, slot_minutes: i32) -> i32 {
    if slot_minutes <= 0 {
        return minutes;
    }
    let rem = (minutes - origin).rem_euclid(slot_minutes);
    if rem * 2 >= slot_minutes {
        minutes + (slot_minutes - rem)
    } else {
        minutes - rem
    }
}

/// Serde adapter storing a `NaiveTime` as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}
