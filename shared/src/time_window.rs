//! Time-of-day values and daily windows
//!
//! A [`DayWindow`] is half-open `[start, end)` in minutes since midnight.
//! When `start > end` it wraps past midnight; when `start == end` it is empty.

use crate::errors::ParseError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

fn hhmm_regex() -> &'static regex_lite::Regex {
    static RE: OnceLock<regex_lite::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex_lite::Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)(?::[0-5]\d)?$")
            .expect("static regex is valid")
    })
}

/// Wall-clock time of day with minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from hour and minute, `None` when out of range
    pub const fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay(hour as u16 * 60 + minute as u16))
        } else {
            None
        }
    }

    /// Build from minutes since midnight, `None` past 23:59
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(TimeOfDay(minutes))
        } else {
            None
        }
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour() as u32, self.minute() as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl<T: Timelike> From<&T> for TimeOfDay {
    fn from(t: &T) -> Self {
        TimeOfDay((t.hour() * 60 + t.minute()) as u16)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = hhmm_regex()
            .captures(trimmed)
            .ok_or_else(|| ParseError::TimeOfDay(s.to_string()))?;
        let hour: u8 = caps[1]
            .parse()
            .map_err(|_| ParseError::TimeOfDay(s.to_string()))?;
        let minute: u8 = caps[2]
            .parse()
            .map_err(|_| ParseError::TimeOfDay(s.to_string()))?;
        TimeOfDay::from_hm(hour, minute).ok_or_else(|| ParseError::TimeOfDay(s.to_string()))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Daily window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl DayWindow {
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Whether the window spans midnight
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        if self.is_empty() {
            false
        } else if self.wraps() {
            time >= self.start || time < self.end
        } else {
            self.start <= time && time < self.end
        }
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("00:00", 0)]
    #[case("06:05", 365)]
    #[case("9:30", 570)]
    #[case(" 22:00 ", 1320)]
    #[case("23:59:59", 1439)]
    fn test_parse_time_of_day(#[case] input: &str, #[case] minutes: u16) {
        assert_eq!(t(input).minutes(), minutes);
    }

    #[rstest]
    #[case("24:00")]
    #[case("12:60")]
    #[case("noon")]
    #[case("")]
    #[case("1230")]
    fn test_reject_invalid_time_of_day(#[case] input: &str) {
        assert_eq!(
            input.parse::<TimeOfDay>(),
            Err(ParseError::TimeOfDay(input.to_string()))
        );
    }

    #[test]
    fn test_overnight_window() {
        let sleep = DayWindow::new(t("22:00"), t("06:00"));
        assert!(sleep.wraps());
        assert!(sleep.contains(t("23:30")));
        assert!(sleep.contains(t("02:00")));
        assert!(sleep.contains(t("22:00")));
        assert!(!sleep.contains(t("06:00")));
        assert!(!sleep.contains(t("12:00")));
    }

    #[test]
    fn test_same_day_window_is_half_open() {
        let active = DayWindow::new(t("08:00"), t("22:00"));
        assert!(active.contains(t("08:00")));
        assert!(active.contains(t("21:59")));
        assert!(!active.contains(t("22:00")));
        assert!(!active.contains(t("07:59")));
    }

    #[test]
    fn test_equal_bounds_never_contain() {
        let window = DayWindow::new(t("09:00"), t("09:00"));
        assert!(window.is_empty());
        assert!(!window.contains(t("09:00")));
        assert!(!window.contains(t("21:00")));
    }

    #[test]
    fn test_serde_uses_hhmm() {
        let window = DayWindow::new(t("22:00"), t("06:00"));
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(json, r#"{"start":"22:00","end":"06:00"}"#);
        let back: DayWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, window);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn test_window_and_complement_partition_the_day(
            start in 0u16..MINUTES_PER_DAY,
            end in 0u16..MINUTES_PER_DAY,
            at in 0u16..MINUTES_PER_DAY,
        ) {
            prop_assume!(start != end);
            let start = TimeOfDay::from_minutes(start).unwrap();
            let end = TimeOfDay::from_minutes(end).unwrap();
            let at = TimeOfDay::from_minutes(at).unwrap();
            let window = DayWindow::new(start, end);
            let complement = DayWindow::new(end, start);
            prop_assert!(window.contains(at) != complement.contains(at));
        }
    }
}
