use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::{
    core::{
        error::{Error, Result},
        window::UsageDay,
    },
    quantity::energy::KilowattHours,
};

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct UsageMonth {
    /// First day of the month.
    pub month: NaiveDate,

    days: Vec<UsageDay>,
    usage: KilowattHours,
}

impl UsageMonth {
    #[must_use]
    pub fn days(&self) -> &[UsageDay] {
        &self.days
    }

    pub const fn usage(&self) -> KilowattHours {
        self.usage
    }

    /// Average usage per metered day of the month.
    ///
    /// Months built by [`split_by_month`] always contain at least one day.
    pub fn average_daily_usage(&self) -> KilowattHours {
        #[expect(clippy::cast_precision_loss)]
        let n_days = self.days.len() as f64;
        self.usage / n_days
    }

    fn validate(&self) -> Result<()> {
        for day in &self.days {
            if truncate_to_month(day.day) != self.month {
                return Err(Error::WindowingInvariant {
                    granularity: "month",
                    bucket: self.month,
                    member: day.day.and_time(chrono::NaiveTime::MIN),
                });
            }
        }
        Ok(())
    }
}

#[must_use]
pub fn truncate_to_month(day: NaiveDate) -> NaiveDate {
    day - Days::new(u64::from(day.day0()))
}

/// Group the days into calendar months, sorted chronologically.
pub fn split_by_month(days: Vec<UsageDay>) -> Result<Vec<UsageMonth>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<UsageDay>> = BTreeMap::new();
    for day in days {
        buckets.entry(truncate_to_month(day.day)).or_default().push(day);
    }
    buckets
        .into_iter()
        .map(|(month, days)| {
            let usage = days.iter().map(UsageDay::usage).sum();
            let month = UsageMonth { month, days, usage };
            month.validate()?;
            Ok(month)
        })
        .collect()
}
