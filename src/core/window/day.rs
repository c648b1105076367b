use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    core::{
        Timestamp,
        error::{Error, Result},
        window::UsageHour,
    },
    quantity::energy::KilowattHours,
};

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct UsageDay {
    pub day: NaiveDate,
    hours: Vec<UsageHour>,
    usage: KilowattHours,
}

impl UsageDay {
    #[must_use]
    pub fn hours(&self) -> &[UsageHour] {
        &self.hours
    }

    pub const fn usage(&self) -> KilowattHours {
        self.usage
    }

    /// End of the last hour.
    #[must_use]
    pub fn end_time(&self) -> Option<Timestamp> {
        self.hours.last().map(UsageHour::end_time)
    }

    fn validate(&self) -> Result<()> {
        for hour in &self.hours {
            let start_time = hour.start_time();
            if start_time.date_naive() != self.day {
                return Err(Error::WindowingInvariant {
                    granularity: "day",
                    bucket: self.day,
                    member: start_time.naive_local(),
                });
            }
        }
        Ok(())
    }
}

/// Group the hours into calendar days, sorted chronologically.
pub fn split_by_day(hours: Vec<UsageHour>) -> Result<Vec<UsageDay>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<UsageHour>> = BTreeMap::new();
    for hour in hours {
        buckets.entry(hour.start_time().date_naive()).or_default().push(hour);
    }
    buckets
        .into_iter()
        .map(|(day, hours)| {
            let usage = hours.iter().map(UsageHour::usage).sum();
            let day = UsageDay { day, hours, usage };
            day.validate()?;
            Ok(day)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::{
        reading::IntervalReading,
        window::{aggregate_into_hours, tests::timestamp},
    };

    #[test]
    fn test_converts_to_day() {
        let hours =
            aggregate_into_hours(&[IntervalReading::quarter_hour(timestamp(2020, 1, 1, 12, 0), 1.0)])
                .unwrap();
        let days = split_by_day(hours.clone()).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_abs_diff_eq!(days[0].usage().0, 1.0);
        assert_eq!(days[0].hours(), hours.as_slice());
        assert_eq!(days[0].end_time(), Some(timestamp(2020, 1, 1, 12, 15)));
    }

    #[test]
    fn test_multiple_hours_aggregate_into_single_day() {
        let hours = aggregate_into_hours(&[
            IntervalReading::quarter_hour(timestamp(2020, 1, 1, 12, 0), 1.0),
            IntervalReading::quarter_hour(timestamp(2020, 1, 1, 13, 0), 2.0),
        ])
        .unwrap();
        let days = split_by_day(hours.clone()).unwrap();
        assert_eq!(days.len(), 1);
        assert_abs_diff_eq!(days[0].usage().0, 3.0);
        assert_eq!(days[0].hours(), hours.as_slice());
    }

    #[test]
    fn test_different_days_aggregate_separately() {
        let hours = aggregate_into_hours(&[
            IntervalReading::quarter_hour(timestamp(2020, 1, 2, 13, 0), 4.0),
            IntervalReading::quarter_hour(timestamp(2020, 1, 1, 12, 0), 3.0),
        ])
        .unwrap();
        let days = split_by_day(hours).unwrap();
        assert_eq!(days.len(), 2);
        assert_abs_diff_eq!(days[0].usage().0, 3.0);
        assert_abs_diff_eq!(days[1].usage().0, 4.0);
    }

    #[test]
    fn test_ordering_does_not_depend_on_input_order() {
        let mut hours = aggregate_into_hours(&[
            IntervalReading::quarter_hour(timestamp(2020, 1, 3, 0, 0), 1.0),
            IntervalReading::quarter_hour(timestamp(2020, 1, 1, 0, 0), 1.0),
            IntervalReading::quarter_hour(timestamp(2020, 1, 2, 0, 0), 1.0),
        ])
        .unwrap();
        hours.reverse();
        let days = split_by_day(hours).unwrap().into_iter().map(|day| day.day).collect::<Vec<_>>();
        assert!(days.is_sorted());
        assert_eq!(days.len(), 3);
    }

    #[test]
    fn test_validate_detects_foreign_hour() {
        let hours =
            aggregate_into_hours(&[IntervalReading::quarter_hour(timestamp(2020, 1, 2, 0, 0), 1.0)])
                .unwrap();
        let day = UsageDay {
            day: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            hours,
            usage: KilowattHours::ZERO,
        };
        let error = day.validate().unwrap_err();
        assert!(matches!(error, Error::WindowingInvariant { granularity: "day", .. }));
        assert!(error.is_internal());
    }
}
