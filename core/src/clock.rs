//! Day clock — turns "now" into the UTC date key that scopes daily records.
//!
//! The day boundary is part of every lookup key. There is no rollover job:
//! the first submission after UTC midnight simply finds no record for the
//! new key and inserts one.

use crate::types::DateKey;
use chrono::{Days, NaiveDate, Utc};
use std::sync::{Mutex, PoisonError};

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Source of the current UTC calendar day.
pub trait DayClock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn today_key(&self) -> DateKey {
        date_key(self.today())
    }
}

/// Wall clock, UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl DayClock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock pinned to a chosen day. Tests move it forward explicitly.
#[derive(Debug)]
pub struct FixedClock {
    day: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self { day: Mutex::new(day) }
    }

    pub fn set(&self, day: NaiveDate) {
        *self.day.lock().unwrap_or_else(PoisonError::into_inner) = day;
    }

    /// Move forward `n` days. Returns the new day, or `None` past chrono's range.
    pub fn advance_days(&self, n: u64) -> Option<NaiveDate> {
        let mut day = self.day.lock().unwrap_or_else(PoisonError::into_inner);
        let next = day.checked_add_days(Days::new(n))?;
        *day = next;
        Some(next)
    }
}

impl DayClock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.day.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn date_key(day: NaiveDate) -> DateKey {
    day.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_is_zero_padded_iso_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_key(day), "2024-03-07");
        assert_eq!(parse_date_key("2024-03-07"), Some(day));
        assert_eq!(parse_date_key("07/03/2024"), None);
    }

    #[test]
    fn fixed_clock_crosses_month_boundary() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(clock.today_key(), "2024-01-31");
        clock.advance_days(1);
        assert_eq!(clock.today_key(), "2024-02-01");
    }
}
