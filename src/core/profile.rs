//! Usage profile by the clock hour across the entire range.

use chrono::Timelike;
use itertools::Itertools;

use crate::{
    core::{Timestamp, window::UsageMonth},
    quantity::energy::KilowattHours,
};

pub type HourlyProfile = [Option<KilowattHours>; 24];

impl<T> ProfileHourly for T where T: ?Sized {}

pub trait ProfileHourly {
    /// Mean usage of each clock hour, [`None`] for the hours without data.
    fn average_hourly(self) -> HourlyProfile
    where
        Self: Sized + Iterator<Item = (Timestamp, KilowattHours)>,
    {
        let mut sums = [KilowattHours::ZERO; 24];
        let mut counts = [0_u32; 24];
        for (timestamp, usage) in self {
            let hour = timestamp.hour() as usize;
            sums[hour] += usage;
            counts[hour] += 1;
        }
        std::array::from_fn(|hour| {
            (counts[hour] != 0).then(|| sums[hour] / f64::from(counts[hour]))
        })
    }

    /// Median usage of each clock hour, less sensitive to the occasional heavy day.
    fn median_hourly(self) -> HourlyProfile
    where
        Self: Sized + Iterator<Item = (Timestamp, KilowattHours)>,
    {
        let mut medians = [None; 24];
        for (hour, values) in self.into_group_map_by(|(timestamp, _)| timestamp.hour()) {
            medians[hour as usize] = median(values.into_iter().map(|(_, usage)| usage).collect());
        }
        medians
    }
}

fn median(mut values: Vec<KilowattHours>) -> Option<KilowattHours> {
    values.sort_unstable_by(|lhs, rhs| lhs.0.total_cmp(&rhs.0));
    let middle = values.len() / 2;
    match values.len() {
        0 => None,
        n if n % 2 == 1 => Some(values[middle]),
        _ => Some((values[middle - 1] + values[middle]) / 2.0),
    }
}

fn hourly_usage(months: &[UsageMonth]) -> impl Iterator<Item = (Timestamp, KilowattHours)> {
    months
        .iter()
        .flat_map(UsageMonth::days)
        .flat_map(|day| day.hours())
        .map(|hour| (hour.start_time(), hour.usage()))
}

#[must_use]
pub fn average_usage_by_hour(months: &[UsageMonth]) -> HourlyProfile {
    hourly_usage(months).average_hourly()
}

#[must_use]
pub fn median_usage_by_hour(months: &[UsageMonth]) -> HourlyProfile {
    hourly_usage(months).median_hourly()
}
