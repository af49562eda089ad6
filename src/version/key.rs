//! Date-shaped version keys.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::VcError;

const KEY_LEN: usize = 8;

/// A `yyyymmdd` version label.
///
/// Ordering is lexicographic over (year, month, day), each compared as an
/// integer. Sub-fields are not checked against the calendar, so `20201341`
/// is a valid key that sorts after `20201231`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionKey {
    year: u16,
    month: u8,
    day: u8,
}

impl VersionKey {
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, VcError> {
        if year > 9999 || month > 99 || day > 99 {
            return Err(VcError::MalformedVersion {
                input: format!("{year}-{month}-{day}"),
            });
        }
        Ok(Self { year, month, day })
    }

    /// Parse an 8-digit version label.
    pub fn parse(input: &str) -> Result<Self, VcError> {
        let malformed = || VcError::MalformedVersion {
            input: input.to_string(),
        };
        if input.len() != KEY_LEN || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let year = input[0..4].parse().map_err(|_| malformed())?;
        let month = input[4..6].parse().map_err(|_| malformed())?;
        let day = input[6..8].parse().map_err(|_| malformed())?;
        Ok(Self { year, month, day })
    }

    /// Version key of today's local date.
    pub fn today() -> Self {
        Self::from(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

impl From<NaiveDate> for VersionKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(0, 9999) as u16,
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }
}

impl FromStr for VersionKey {
    type Err = VcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for VersionKey {
    type Error = VcError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_roundtrip() {
        let key = VersionKey::parse("20200721").unwrap();
        assert_eq!(key.year(), 2020);
        assert_eq!(key.month(), 7);
        assert_eq!(key.day(), 21);
        assert_eq!(key.to_string(), "20200721");
    }

    #[test]
    fn test_ordering_is_field_wise() {
        let a: VersionKey = "20200601".parse().unwrap();
        let b: VersionKey = "20200721".parse().unwrap();
        let c: VersionKey = "20210101".parse().unwrap();
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        for bad in ["", "2020061", "202006011", "2020-6-1", "abcdefgh", " 2020060", "２０２００６０１"] {
            assert!(
                matches!(VersionKey::parse(bad), Err(VcError::MalformedVersion { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_naive_date() {
        let date = NaiveDate::from_ymd_opt(2020, 8, 1).unwrap();
        assert_eq!(VersionKey::from(date).to_string(), "20200801");
    }

    #[test]
    fn test_today_is_well_formed() {
        let today = VersionKey::today();
        assert!(VersionKey::parse(&today.to_string()).is_ok());
    }
}
