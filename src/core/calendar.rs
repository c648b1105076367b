//! Season, weekend, and holiday rules shared by the tariffs and the billing.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::core::Timestamp;

/// Observed California state holidays, matched by month and day only.
///
/// Source: <https://www.sos.ca.gov/state-holidays>, 2021.
const STATE_HOLIDAYS: [(u32, u32); 11] = [
    (1, 1),
    (1, 18),
    (2, 15),
    (3, 31),
    (5, 31),
    (7, 5),
    (9, 6),
    (11, 11),
    (11, 25),
    (11, 26),
    (12, 25),
];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, serde::Serialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    #[must_use]
    pub const fn of_month(month: u32) -> Self {
        if is_summer_month(month) { Self::Summer } else { Self::Winter }
    }

    #[must_use]
    pub fn of(date: impl Datelike) -> Self {
        Self::of_month(date.month())
    }
}

/// June through September.
#[must_use]
pub const fn is_summer_month(month: u32) -> bool {
    matches!(month, 6..=9)
}

#[must_use]
pub fn is_weekend(timestamp: Timestamp) -> bool {
    is_weekend_day(timestamp.date_naive())
}

#[must_use]
pub fn is_holiday(timestamp: Timestamp) -> bool {
    is_holiday_day(timestamp.date_naive())
}

#[must_use]
pub fn is_weekday(timestamp: Timestamp) -> bool {
    is_weekday_day(timestamp.date_naive())
}

#[must_use]
pub fn is_weekend_day(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[must_use]
pub fn is_holiday_day(date: NaiveDate) -> bool {
    STATE_HOLIDAYS.contains(&(date.month(), date.day()))
}

#[must_use]
pub fn is_weekday_day(date: NaiveDate) -> bool {
    !is_weekend_day(date) && !is_holiday_day(date)
}
