use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{billing::BillSummary, domestic::DomesticBreakdown, profile::HourlyProfile},
    quantity::{cost::Cost, energy::KilowattHours},
    report::MonthlyComparison,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn cost_cell(cost: Cost) -> Cell {
    Cell::new(cost)
        .set_alignment(CellAlignment::Right)
        .fg(if cost.is_negative() { Color::Green } else { Color::Red })
}

fn energy_cell(energy: KilowattHours) -> Cell {
    Cell::new(energy).set_alignment(CellAlignment::Right)
}

#[must_use]
pub fn build_monthly_comparison_table(comparison: &MonthlyComparison) -> Table {
    let mut table = new_table();
    let mut header = vec![
        Cell::new("Month"),
        Cell::new("Days"),
        Cell::new("Usage"),
        Cell::new("Daily average"),
    ];
    header.extend(comparison.plans.iter().map(Cell::new));
    table.set_header(header);

    for row in &comparison.rows {
        let cheapest_plan = row.cheapest_plan();
        let mut cells = vec![
            Cell::new(row.month.format("%Y-%m")),
            Cell::new(row.n_days).set_alignment(CellAlignment::Right),
            energy_cell(row.usage),
            energy_cell(row.average_daily_usage).add_attribute(Attribute::Dim),
        ];
        cells.extend(comparison.plans.iter().map(|plan| {
            let cost = row.costs.get(plan).copied().unwrap_or_default();
            let cell = Cell::new(cost).set_alignment(CellAlignment::Right);
            if Some(*plan) == cheapest_plan { cell.fg(Color::Green) } else { cell }
        }));
        table.add_row(cells);
    }

    let cheapest_plan = comparison.cheapest_plan();
    let n_days = comparison.rows.iter().map(|row| row.n_days).sum::<usize>();
    let usage = comparison.rows.iter().map(|row| row.usage).sum::<KilowattHours>();
    let mut totals = vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(n_days).set_alignment(CellAlignment::Right),
        energy_cell(usage),
        Cell::new(""),
    ];
    totals.extend(comparison.plans.iter().map(|plan| {
        let cell = Cell::new(comparison.totals.get(plan).copied().unwrap_or_default())
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold);
        if Some(*plan) == cheapest_plan { cell.fg(Color::Green) } else { cell }
    }));
    table.add_row(totals);
    table
}

#[must_use]
pub fn build_bill_table(summary: &BillSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Period", "Hours", "Usage", "Rate", "Cost"]);
    for (period, usage) in summary.usage_by_period() {
        let rate = summary.rate(*period).unwrap_or_default();
        table.add_row(vec![
            Cell::new(period),
            Cell::new(summary.hours_by_period().get(period).copied().unwrap_or_default())
                .set_alignment(CellAlignment::Right),
            energy_cell(*usage),
            Cell::new(rate).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            cost_cell(*usage * rate),
        ]);
    }
    let rows = [
        (
            "Net metered cost",
            Some(summary.net_energy_usage()),
            summary.net_metered_cost_no_baseline(),
        ),
        ("Baseline credit", Some(summary.max_baseline_allowance()), summary.baseline_credit()),
        (
            "Non-bypassable charges",
            Some(summary.energy_imported()),
            summary.non_bypassable_charges(),
        ),
        ("Basic charge", None, summary.total_basic_charge()),
        ("Taxes", None, summary.taxes()),
    ];
    for (title, energy, cost) in rows {
        table.add_row(vec![
            Cell::new(title),
            Cell::new(""),
            energy.map_or_else(|| Cell::new(""), energy_cell),
            Cell::new(""),
            cost_cell(cost),
        ]);
    }
    table.add_row(vec![
        Cell::new(format!("True-up for {}", summary.plan())).add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} → {}, {} days",
            summary.first_day(),
            summary.last_day(),
            summary.n_days()
        ))
        .add_attribute(Attribute::Dim),
        energy_cell(summary.energy_exported()).fg(Color::Green),
        Cell::new(format!("min. {}", summary.total_minimum_charge())).add_attribute(Attribute::Dim),
        cost_cell(summary.true_up()).add_attribute(Attribute::Bold),
    ]);
    table
}

#[must_use]
pub fn build_domestic_table(breakdown: &DomesticBreakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Days", "Usage", "Baseline", "Tier 1", "Tier 2", "Tier 3", "Energy", "Minimum", "Daily",
        "Total",
    ]);
    table.add_row(vec![
        Cell::new(breakdown.n_days).set_alignment(CellAlignment::Right),
        energy_cell(breakdown.usage),
        energy_cell(breakdown.baseline).add_attribute(Attribute::Dim),
        energy_cell(breakdown.tier1),
        energy_cell(breakdown.tier2).fg(Color::DarkYellow),
        energy_cell(breakdown.tier3).fg(Color::Red),
        cost_cell(breakdown.nem_cost),
        cost_cell(breakdown.minimum_charge_shortfall),
        cost_cell(breakdown.daily_charges),
        cost_cell(breakdown.total).add_attribute(Attribute::Bold),
    ]);
    table
}

#[must_use]
pub fn build_hourly_profile_table(average: &HourlyProfile, median: &HourlyProfile) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Hour", "Average", "Median"]);
    for (hour, (average, median)) in average.iter().zip(median).enumerate() {
        table.add_row(vec![
            Cell::new(format!("{hour:02}:00")),
            average.map_or_else(|| Cell::new("-"), energy_cell),
            median.map_or_else(|| Cell::new("-"), energy_cell).add_attribute(Attribute::Dim),
        ]);
    }
    table
}
