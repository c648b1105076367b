//! Time-of-use billing with net energy metering.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    core::{
        baseline::BaselineAllocation,
        calendar::{is_holiday_day, is_weekday_day, is_weekend_day},
        error::{Error, Result},
        period::CostPeriod,
        tariff::TariffPlan,
        window::UsageDay,
    },
    prelude::*,
    quantity::{
        cost::Cost,
        energy::KilowattHours,
        rate::KilowattHourRate,
    },
};

pub const STATE_TAX_RATE: KilowattHourRate = KilowattHourRate::new(0.00030);

/// NEM 2.0 non-bypassable charge, applied to the imported energy only.
pub const NBC_RATE: KilowattHourRate = KilowattHourRate::new(0.01362);

/// Negative: the credit reduces the bill for the net consumption within the baseline.
pub const BASELINE_CREDIT_RATE: KilowattHourRate = KilowattHourRate::new(-0.07848);

/// Usage of a day range accumulated under a single plan.
///
/// All the derived amounts are pure functions of the accumulated values.
#[must_use]
#[derive(Clone, Debug)]
pub struct BillSummary {
    plan: TariffPlan,
    first_day: NaiveDate,
    last_day: NaiveDate,
    n_days: usize,
    weekdays: usize,
    weekends: usize,
    holidays: usize,

    /// Only the periods observed in the range.
    usage_by_period: BTreeMap<CostPeriod, KilowattHours>,

    hours_by_period: BTreeMap<CostPeriod, usize>,

    /// Unit prices of the observed periods, resolved while billing.
    rates: BTreeMap<CostPeriod, KilowattHourRate>,

    energy_imported: KilowattHours,
    energy_exported: KilowattHours,
    max_baseline_allowance: KilowattHours,
}

/// Bill the days under the plan.
///
/// Every hour is classified into a cost period, and its net usage counts either as import or as
/// export, so the readings offsetting each other within the same hour never show up in either.
#[instrument(skip_all, fields(plan = %plan, n_days = days.len()))]
pub fn bill(
    days: &[UsageDay],
    plan: TariffPlan,
    baseline: BaselineAllocation,
) -> Result<BillSummary> {
    let (Some(first_day), Some(last_day)) = (days.first(), days.last()) else {
        return Err(Error::EmptyRange);
    };

    let mut usage_by_period = BTreeMap::<CostPeriod, KilowattHours>::new();
    let mut hours_by_period = BTreeMap::<CostPeriod, usize>::new();
    let mut energy_imported = KilowattHours::ZERO;
    let mut energy_exported = KilowattHours::ZERO;
    let (mut weekdays, mut weekends, mut holidays) = (0, 0, 0);

    for day in days {
        if is_weekend_day(day.day) {
            weekends += 1;
        }
        if is_holiday_day(day.day) {
            holidays += 1;
        }
        if is_weekday_day(day.day) {
            weekdays += 1;
        }
        for hour in day.hours() {
            let period = plan.classify(hour.start_time())?;
            let usage = hour.usage();
            *usage_by_period.entry(period).or_default() += usage;
            *hours_by_period.entry(period).or_default() += 1;
            if usage.is_positive() {
                energy_imported += usage;
            } else {
                energy_exported += usage;
            }
        }
    }

    let rates = usage_by_period
        .keys()
        .map(|period| Ok((*period, plan.cost(*period)?)))
        .collect::<Result<BTreeMap<_, _>>>()?;
    let max_baseline_allowance = if plan.has_baseline_allocation() {
        baseline.allocation_for_days(days)
    } else {
        KilowattHours::ZERO
    };

    let summary = BillSummary {
        plan,
        first_day: first_day.day,
        last_day: last_day.day,
        n_days: days.len(),
        weekdays,
        weekends,
        holidays,
        usage_by_period,
        hours_by_period,
        rates,
        energy_imported,
        energy_exported,
        max_baseline_allowance,
    };
    debug!(
        n_periods = summary.usage_by_period.len(),
        net_usage = ?summary.net_energy_usage(),
        true_up = ?summary.true_up(),
        "billed"
    );
    Ok(summary)
}

impl BillSummary {
    pub const fn plan(&self) -> TariffPlan {
        self.plan
    }

    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    #[must_use]
    pub const fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    #[must_use]
    pub const fn n_days(&self) -> usize {
        self.n_days
    }

    /// Days which are neither weekends nor holidays.
    #[must_use]
    pub const fn weekdays(&self) -> usize {
        self.weekdays
    }

    #[must_use]
    pub const fn weekends(&self) -> usize {
        self.weekends
    }

    /// Holidays, including those falling on a weekend.
    #[must_use]
    pub const fn holidays(&self) -> usize {
        self.holidays
    }

    #[must_use]
    pub const fn usage_by_period(&self) -> &BTreeMap<CostPeriod, KilowattHours> {
        &self.usage_by_period
    }

    #[must_use]
    pub const fn hours_by_period(&self) -> &BTreeMap<CostPeriod, usize> {
        &self.hours_by_period
    }

    /// Unit price of an observed period.
    #[must_use]
    pub fn rate(&self, period: CostPeriod) -> Option<KilowattHourRate> {
        self.rates.get(&period).copied()
    }

    /// Sum of the hourly usage over the hours with net import.
    pub const fn energy_imported(&self) -> KilowattHours {
        self.energy_imported
    }

    /// Sum of the hourly usage over the hours with net export, never positive.
    pub const fn energy_exported(&self) -> KilowattHours {
        self.energy_exported
    }

    pub fn net_energy_usage(&self) -> KilowattHours {
        self.usage_by_period.values().copied().sum()
    }

    pub fn net_metered_cost_no_baseline(&self) -> Cost {
        self.usage_by_period
            .iter()
            .map(|(period, usage)| *usage * self.rates.get(period).copied().unwrap_or_default())
            .sum()
    }

    pub fn taxes(&self) -> Cost {
        let usage = self.net_energy_usage();
        if usage.is_positive() { usage * STATE_TAX_RATE } else { Cost::ZERO }
    }

    pub fn non_bypassable_charges(&self) -> Cost {
        self.energy_imported * NBC_RATE
    }

    /// Total baseline allocation over the range, zero for the plans without one.
    pub const fn max_baseline_allowance(&self) -> KilowattHours {
        self.max_baseline_allowance
    }

    /// Credit for the net usage within the baseline allowance.
    ///
    /// The credited energy is clamped by both the net usage and the allowance, and follows the sign
    /// of the net usage: a net export turns the credit into a charge.
    pub fn baseline_credit(&self) -> Cost {
        let usage = self.net_energy_usage();
        usage.abs().min(self.max_baseline_allowance).copysign(usage) * BASELINE_CREDIT_RATE
    }

    pub fn total_basic_charge(&self) -> Cost {
        self.plan.daily_basic_charge().over_days(self.n_days)
    }

    /// Minimum charge over the range, for reference only: it does not contribute to the true-up.
    pub fn total_minimum_charge(&self) -> Cost {
        self.plan.minimum_daily_charge().over_days(self.n_days)
    }

    /// Final settlement amount for the range.
    pub fn true_up(&self) -> Cost {
        self.net_metered_cost_no_baseline()
            + self.baseline_credit()
            + self.non_bypassable_charges()
            + self.total_basic_charge()
            + self.taxes()
    }

    pub fn average_daily_usage(&self) -> KilowattHours {
        #[expect(clippy::cast_precision_loss)]
        let n_days = self.n_days as f64;
        self.net_energy_usage() / n_days
    }
}
