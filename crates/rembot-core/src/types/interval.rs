//! Kline interval labels such as `15m`, `1h` or `1d`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit suffix of an interval label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
}

impl IntervalUnit {
    fn from_suffix(c: char) -> Option<Self> {
        match c {
            's' => Some(IntervalUnit::Second),
            'm' => Some(IntervalUnit::Minute),
            'h' => Some(IntervalUnit::Hour),
            'd' => Some(IntervalUnit::Day),
            'w' => Some(IntervalUnit::Week),
            _ => None,
        }
    }

    fn suffix(&self) -> char {
        match self {
            IntervalUnit::Second => 's',
            IntervalUnit::Minute => 'm',
            IntervalUnit::Hour => 'h',
            IntervalUnit::Day => 'd',
            IntervalUnit::Week => 'w',
        }
    }

    /// Length of one unit in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            IntervalUnit::Second => 1,
            IntervalUnit::Minute => 60,
            IntervalUnit::Hour => 3_600,
            IntervalUnit::Day => 86_400,
            IntervalUnit::Week => 604_800,
        }
    }
}

/// A validated interval label: one or more digits followed by `s`, `m`, `h`, `d` or `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Interval {
    count: u32,
    unit: IntervalUnit,
}

impl Interval {
    pub fn new(count: u32, unit: IntervalUnit) -> Self {
        Self { count, unit }
    }

    /// Get the duration of the interval in seconds.
    pub fn as_secs(&self) -> u64 {
        u64::from(self.count) * self.unit.as_secs()
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::new(15, IntervalUnit::Minute)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid interval: '{}'. Examples: '15m', '1h', '4h', '1d'.", s);

        let mut chars = s.chars();
        let unit = chars
            .next_back()
            .and_then(IntervalUnit::from_suffix)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let count = digits.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self { count, unit })
    }
}

impl TryFrom<String> for Interval {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_parse() {
        assert_eq!(Interval::from_str("15m").unwrap(), Interval::new(15, IntervalUnit::Minute));
        assert_eq!(Interval::from_str("1h").unwrap().as_secs(), 3_600);
        assert_eq!(Interval::from_str("1d").unwrap().as_secs(), 86_400);
        assert_eq!(Interval::from_str("2w").unwrap().as_secs(), 1_209_600);
        assert_eq!(Interval::from_str("30s").unwrap().as_secs(), 30);
    }

    #[test]
    fn test_interval_rejects_malformed() {
        for bad in ["", "m", "15", "15M", "1.5h", "-1h", "15min", " 15m", "h15"] {
            assert!(Interval::from_str(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_interval_display_round_trip() {
        let interval = Interval::from_str("4h").unwrap();
        assert_eq!(interval.to_string(), "4h");
        assert_eq!(Interval::default().to_string(), "15m");
    }
}
