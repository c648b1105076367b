//! Side-by-side comparison of the plans, month by month.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use enumset::EnumSet;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    core::{
        baseline::BaselineAllocation,
        billing::{BillSummary, bill},
        domestic::{DomesticBreakdown, domestic_breakdown},
        error::Result,
        period::CostPeriod,
        profile::HourlyProfile,
        tariff::TariffPlan,
        window::{UsageDay, UsageMonth},
    },
    quantity::{cost::Cost, energy::KilowattHours},
};

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct MonthRow {
    /// First day of the month.
    pub month: NaiveDate,

    pub n_days: usize,
    pub usage: KilowattHours,
    pub average_daily_usage: KilowattHours,

    /// Domestic total or time-of-use true-up of each plan.
    pub costs: BTreeMap<TariffPlan, Cost>,
}

impl MonthRow {
    /// Plan with the lowest cost in the month.
    #[must_use]
    pub fn cheapest_plan(&self) -> Option<TariffPlan> {
        cheapest(&self.costs)
    }
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct MonthlyComparison {
    pub plans: Vec<TariffPlan>,
    pub rows: Vec<MonthRow>,
    pub totals: BTreeMap<TariffPlan, Cost>,
}

impl MonthlyComparison {
    pub fn try_new(
        months: &[UsageMonth],
        plans: EnumSet<TariffPlan>,
        baseline: BaselineAllocation,
    ) -> Result<Self> {
        let rows = months
            .iter()
            .map(|month| {
                let costs = plans
                    .iter()
                    .map(|plan| Ok((plan, plan_cost(month.days(), plan, baseline)?)))
                    .collect::<Result<BTreeMap<_, _>>>()?;
                Ok(MonthRow {
                    month: month.month,
                    n_days: month.days().len(),
                    usage: month.usage(),
                    average_daily_usage: month.average_daily_usage(),
                    costs,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let totals = rows
            .iter()
            .flat_map(|row| row.costs.iter().map(|(plan, cost)| (*plan, *cost)))
            .into_grouping_map()
            .sum()
            .into_iter()
            .collect();
        Ok(Self { plans: plans.iter().collect(), rows, totals })
    }

    /// Plan with the lowest cost over the entire range.
    #[must_use]
    pub fn cheapest_plan(&self) -> Option<TariffPlan> {
        cheapest(&self.totals)
    }
}

fn cheapest(costs: &BTreeMap<TariffPlan, Cost>) -> Option<TariffPlan> {
    costs.iter().min_by(|(_, lhs), (_, rhs)| lhs.0.total_cmp(&rhs.0)).map(|(plan, _)| *plan)
}

/// What the month costs under the plan: the tiered total for the domestic plan, and the true-up
/// for the time-of-use ones.
fn plan_cost(days: &[UsageDay], plan: TariffPlan, baseline: BaselineAllocation) -> Result<Cost> {
    if plan == TariffPlan::DomesticTiered {
        Ok(domestic_breakdown(days, baseline).total)
    } else {
        Ok(bill(days, plan, baseline)?.true_up())
    }
}

/// Flattened bill with all the derived amounts, for the machine-readable output.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct BillReport {
    pub plan: TariffPlan,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub n_days: usize,
    pub weekdays: usize,
    pub weekends: usize,
    pub holidays: usize,
    pub usage_by_period: BTreeMap<CostPeriod, KilowattHours>,
    pub hours_by_period: BTreeMap<CostPeriod, usize>,
    pub energy_imported: KilowattHours,
    pub energy_exported: KilowattHours,
    pub net_energy_usage: KilowattHours,
    pub net_metered_cost_no_baseline: Cost,
    pub taxes: Cost,
    pub non_bypassable_charges: Cost,
    pub max_baseline_allowance: KilowattHours,
    pub baseline_credit: Cost,
    pub total_basic_charge: Cost,
    pub total_minimum_charge: Cost,
    pub true_up: Cost,
    pub average_daily_usage: KilowattHours,
}

impl From<&BillSummary> for BillReport {
    fn from(summary: &BillSummary) -> Self {
        Self {
            plan: summary.plan(),
            first_day: summary.first_day(),
            last_day: summary.last_day(),
            n_days: summary.n_days(),
            weekdays: summary.weekdays(),
            weekends: summary.weekends(),
            holidays: summary.holidays(),
            usage_by_period: summary.usage_by_period().clone(),
            hours_by_period: summary.hours_by_period().clone(),
            energy_imported: summary.energy_imported(),
            energy_exported: summary.energy_exported(),
            net_energy_usage: summary.net_energy_usage(),
            net_metered_cost_no_baseline: summary.net_metered_cost_no_baseline(),
            taxes: summary.taxes(),
            non_bypassable_charges: summary.non_bypassable_charges(),
            max_baseline_allowance: summary.max_baseline_allowance(),
            baseline_credit: summary.baseline_credit(),
            total_basic_charge: summary.total_basic_charge(),
            total_minimum_charge: summary.total_minimum_charge(),
            true_up: summary.true_up(),
            average_daily_usage: summary.average_daily_usage(),
        }
    }
}

/// Everything the report command prints, in one document.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub comparison: MonthlyComparison,
    pub bills: Vec<BillReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domestic: Option<DomesticBreakdown>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_profile: Option<HourlyProfile>,
}
