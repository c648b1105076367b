//! Tiered domestic plan: cumulative usage bands over multiples of the baseline allocation.

use crate::{
    core::{baseline::BaselineAllocation, window::UsageDay},
    prelude::*,
    quantity::{
        cost::Cost,
        energy::KilowattHours,
        rate::{DailyRate, KilowattHourRate},
    },
};

pub const TIER1_RATE: KilowattHourRate = KilowattHourRate::new(0.23);
pub const TIER2_RATE: KilowattHourRate = KilowattHourRate::new(0.30);
pub const TIER3_RATE: KilowattHourRate = KilowattHourRate::new(0.37);

pub const DAILY_RATE: DailyRate = DailyRate::new(0.031);
pub const MINIMUM_DAILY_RATE: DailyRate = DailyRate::new(0.35);

/// Usage beyond this many baselines is priced at the third tier.
const TIER3_THRESHOLD: f64 = 4.0;

#[must_use]
#[derive(Clone, Debug, serde::Serialize)]
pub struct DomesticBreakdown {
    pub n_days: usize,

    /// Signed net usage over the range.
    pub usage: KilowattHours,

    pub baseline: KilowattHours,

    /// Up to one baseline, same sign as the usage.
    pub tier1: KilowattHours,

    /// Between one and four baselines, same sign as the usage.
    pub tier2: KilowattHours,

    /// Beyond four baselines, same sign as the usage.
    pub tier3: KilowattHours,

    pub nem_cost: Cost,

    /// Top-up to the minimum charge, zero when the energy cost already covers it.
    pub minimum_charge_shortfall: Cost,

    pub daily_charges: Cost,

    pub total: Cost,
}

/// Price the days under the tiered domestic plan.
///
/// The tiers are split by the magnitude of the net usage, so under net export all of them turn
/// negative and the cost becomes a credit.
pub fn domestic_breakdown(days: &[UsageDay], baseline: BaselineAllocation) -> DomesticBreakdown {
    let n_days = days.len();
    let allocation = baseline.allocation_for_days(days);
    let usage: KilowattHours = days.iter().map(UsageDay::usage).sum();

    let magnitude = usage.abs();
    let tier3 = (magnitude - allocation * TIER3_THRESHOLD).max(KilowattHours::ZERO);
    let remaining = magnitude - tier3;
    let tier2 = (remaining - allocation).max(KilowattHours::ZERO);
    let tier1 = remaining - tier2;
    let (tier1, tier2, tier3) =
        (tier1.copysign(usage), tier2.copysign(usage), tier3.copysign(usage));

    let nem_cost = tier1 * TIER1_RATE + tier2 * TIER2_RATE + tier3 * TIER3_RATE;
    let minimum_charge_shortfall =
        (MINIMUM_DAILY_RATE.over_days(n_days) - nem_cost.max(Cost::ZERO)).max(Cost::ZERO);
    let daily_charges = DAILY_RATE.over_days(n_days);
    let total = nem_cost + minimum_charge_shortfall + daily_charges;

    debug!(n_days, ?usage, ?allocation, ?total, "domestic breakdown");
    DomesticBreakdown {
        n_days,
        usage,
        baseline: allocation,
        tier1,
        tier2,
        tier3,
        nem_cost,
        minimum_charge_shortfall,
        daily_charges,
        total,
    }
}
