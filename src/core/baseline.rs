//! Daily kWh allowance priced at the preferential baseline rate.
//!
//! Source: <https://www.sce.com/residential/rates/Standard-Residential-Rate-Plan>, Simi Valley.

use bon::Builder;
use chrono::NaiveDate;

use crate::{
    core::{calendar::Season, window::UsageDay},
    quantity::energy::KilowattHours,
};

const SUMMER_DAILY_ALLOCATION: KilowattHours = KilowattHours::new(16.5);
const WINTER_DAILY_ALLOCATION: KilowattHours = KilowattHours::new(12.3);
const MEDICAL_DAILY_ALLOCATION: KilowattHours = KilowattHours::new(16.5);

/// Baseline allocation settings, resolved once per run.
#[must_use]
#[derive(Copy, Clone, Debug, Default, Builder)]
pub struct BaselineAllocation {
    /// Add the medical baseline allocation on top of the seasonal one.
    #[builder(default)]
    medical: bool,
}

impl BaselineAllocation {
    pub fn daily_allocation(self, day: NaiveDate) -> KilowattHours {
        let seasonal = match Season::of(day) {
            Season::Summer => SUMMER_DAILY_ALLOCATION,
            Season::Winter => WINTER_DAILY_ALLOCATION,
        };
        if self.medical { seasonal + MEDICAL_DAILY_ALLOCATION } else { seasonal }
    }

    pub fn allocation_for_days(self, days: &[UsageDay]) -> KilowattHours {
        days.iter().map(|day| self.daily_allocation(day.day)).sum()
    }
}
