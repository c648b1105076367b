use chrono::{NaiveDate, NaiveDateTime};

use crate::core::{Timestamp, period::CostPeriod, tariff::TariffPlan};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A reading which starts and ends in different clock hours.
    #[error("start and end of a reading should be within the same hour: {start}..{end}")]
    MalformedInterval { start: Timestamp, end: Timestamp },

    /// A bucketed reading, hour, or day disagrees with its bucket key.
    #[error("{member} does not belong to the {granularity} of {bucket}")]
    WindowingInvariant { granularity: &'static str, bucket: NaiveDate, member: NaiveDateTime },

    /// Classification predicates of a plan do not partition the timeline.
    #[error("{plan} classifies {timestamp} into {n_matches} periods instead of exactly one")]
    PeriodPartition { plan: TariffPlan, timestamp: Timestamp, n_matches: usize },

    #[error("{plan} does not price {period}")]
    InvalidPeriod { plan: TariffPlan, period: CostPeriod },

    #[error("cannot bill an empty range of days")]
    EmptyRange,
}

impl Error {
    /// Whether the error indicates a defect rather than bad input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::WindowingInvariant { .. }
                | Self::PeriodPartition { .. }
                | Self::InvalidPeriod { .. }
        )
    }
}
