use bon::Builder;
use chrono::TimeDelta;

use crate::{core::Timestamp, quantity::energy::KilowattHours};

/// Single metered interval as exported by the utility.
#[must_use]
#[derive(Clone, Debug, PartialEq, Builder)]
pub struct IntervalReading {
    /// Inclusive.
    pub start_time: Timestamp,

    /// Exclusive.
    pub end_time: Timestamp,

    /// Positive for import from the grid, negative for export.
    #[builder(into)]
    pub usage: KilowattHours,

    /// Reading quality marker, passed through untouched.
    #[builder(default, into)]
    pub quality: String,
}

impl IntervalReading {
    pub const FIFTEEN_MINUTES: TimeDelta = TimeDelta::minutes(15);

    pub const ONE_HOUR: TimeDelta = TimeDelta::hours(1);

    /// Fifteen-minute reading starting at `start_time`.
    pub fn quarter_hour(start_time: Timestamp, usage: impl Into<KilowattHours>) -> Self {
        Self::builder()
            .start_time(start_time)
            .end_time(start_time + Self::FIFTEEN_MINUTES)
            .usage(usage)
            .build()
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}
