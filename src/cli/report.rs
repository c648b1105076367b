use std::path::PathBuf;

use clap::Parser;
use enumset::EnumSet;

use crate::{
    cli::{BaselineArgs, Format, InputFormat},
    core::{
        baseline::BaselineAllocation,
        billing::bill,
        domestic::domestic_breakdown,
        profile::{average_usage_by_hour, median_usage_by_hour},
        tariff::TariffPlan,
        window::{aggregate_into_hours, split_by_day, split_by_month},
    },
    greenbutton,
    prelude::*,
    report::{BillReport, MonthlyComparison, Report},
    sense,
    tables::{
        build_bill_table,
        build_domestic_table,
        build_hourly_profile_table,
        build_monthly_comparison_table,
    },
};

#[derive(Parser)]
pub struct ReportArgs {
    /// CSV export with the interval usage.
    #[clap(long = "input-file", env = "INPUT_FILE")]
    pub input_file: PathBuf,

    #[clap(long = "input-format", value_enum, default_value = "greenbutton", env = "INPUT_FORMAT")]
    pub input_format: InputFormat,

    #[clap(long, value_enum, default_value = "table", env = "FORMAT")]
    pub format: Format,

    /// Also show the average and median usage by the clock hour.
    #[clap(long = "hourly-profile", env = "HOURLY_PROFILE")]
    pub hourly_profile: bool,

    #[clap(
        long = "plans",
        env = "PLANS",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "domestic,tou-d-a,tou-d-prime,tou-d-5-8pm",
    )]
    pub plans: Vec<TariffPlan>,

    #[clap(flatten)]
    pub baseline: BaselineArgs,
}

impl ReportArgs {
    #[must_use]
    pub fn plans(&self) -> EnumSet<TariffPlan> {
        self.plans.iter().copied().collect()
    }
}

#[instrument(skip_all)]
pub fn report(args: &ReportArgs) -> Result {
    let plans = args.plans();
    ensure!(!plans.is_empty(), "at least one plan is required");
    let baseline = BaselineAllocation::from(args.baseline);

    let readings = match args.input_format {
        InputFormat::GreenButton => greenbutton::read_file(&args.input_file)?,
        InputFormat::Sense => sense::read_file(&args.input_file)?,
    };
    ensure!(!readings.is_empty(), "no usage readings found in `{}`", args.input_file.display());

    let hours = aggregate_into_hours(&readings).context("failed to aggregate the readings")?;
    let days = split_by_day(hours)?;
    info!(
        n_days = days.len(),
        first = ?days.first().map(|day| day.day),
        last = ?days.last().map(|day| day.day),
        "aggregated the readings"
    );
    let months = split_by_month(days.clone())?;

    let comparison = MonthlyComparison::try_new(&months, plans, baseline)?;
    let bills = (plans & TariffPlan::time_of_use())
        .iter()
        .map(|plan| bill(&days, plan, baseline))
        .collect::<Result<Vec<_>, _>>()?;
    let domestic =
        plans.contains(TariffPlan::DomesticTiered).then(|| domestic_breakdown(&days, baseline));
    if let Some(plan) = comparison.cheapest_plan() {
        info!(%plan, total = %comparison.totals[&plan], "cheapest plan");
    }

    match args.format {
        Format::Table => {
            println!("{}", build_monthly_comparison_table(&comparison));
            for summary in &bills {
                println!("{}", build_bill_table(summary));
            }
            if let Some(domestic) = &domestic {
                println!("{}", build_domestic_table(domestic));
            }
            if args.hourly_profile {
                println!(
                    "{}",
                    build_hourly_profile_table(
                        &average_usage_by_hour(&months),
                        &median_usage_by_hour(&months),
                    ),
                );
            }
        }
        Format::Json => {
            let report = Report {
                comparison,
                bills: bills.iter().map(BillReport::from).collect(),
                domestic,
                hourly_profile: args.hourly_profile.then(|| average_usage_by_hour(&months)),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
