use std::collections::BTreeMap;

use chrono::{TimeDelta, Timelike};

use crate::{
    core::{
        Timestamp,
        error::{Error, Result},
        reading::IntervalReading,
    },
    prelude::*,
    quantity::energy::KilowattHours,
};

/// Readings which fall within the same clock hour.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct UsageHour {
    start_time: Timestamp,
    readings: Vec<IntervalReading>,
}

impl UsageHour {
    /// Build the bucket, re-checking every reading against the bucket key.
    fn try_new(start_time: Timestamp, readings: Vec<IntervalReading>) -> Result<Self> {
        for reading in &readings {
            if hour_of(reading)? != start_time {
                return Err(Error::WindowingInvariant {
                    granularity: "hour",
                    bucket: start_time.date_naive(),
                    member: reading.start_time.naive_local(),
                });
            }
        }
        Ok(Self { start_time, readings })
    }

    pub const fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// End of the last reading, or the hour start when there are no readings.
    pub fn end_time(&self) -> Timestamp {
        self.readings.last().map_or(self.start_time, |reading| reading.end_time)
    }

    #[must_use]
    pub fn readings(&self) -> &[IntervalReading] {
        &self.readings
    }

    pub fn usage(&self) -> KilowattHours {
        self.readings.iter().map(|reading| reading.usage).sum()
    }
}

#[must_use]
pub fn truncate_to_hour(timestamp: Timestamp) -> Timestamp {
    timestamp
        - TimeDelta::seconds(i64::from(timestamp.minute() * 60 + timestamp.second()))
        - TimeDelta::nanoseconds(i64::from(timestamp.nanosecond()))
}

/// Truncated hour of the reading, provided it does not cross an hour boundary.
fn hour_of(reading: &IntervalReading) -> Result<Timestamp> {
    let start = truncate_to_hour(reading.start_time);
    let end = truncate_to_hour(reading.end_time - TimeDelta::seconds(1));
    if start == end {
        Ok(start)
    } else {
        Err(Error::MalformedInterval { start: reading.start_time, end: reading.end_time })
    }
}

/// Group the readings into clock hours, sorted chronologically.
///
/// A single reading crossing an hour boundary fails the entire aggregation.
#[instrument(skip_all, fields(n_readings = readings.len()))]
pub fn aggregate_into_hours(readings: &[IntervalReading]) -> Result<Vec<UsageHour>> {
    let mut buckets: BTreeMap<Timestamp, Vec<IntervalReading>> = BTreeMap::new();
    for reading in readings {
        buckets.entry(hour_of(reading)?).or_default().push(reading.clone());
    }
    let hours = buckets
        .into_iter()
        .map(|(start_time, mut readings)| {
            readings.sort_by_key(|reading| reading.start_time);
            UsageHour::try_new(start_time, readings)
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(n_hours = hours.len(), "aggregated");
    Ok(hours)
}
