mod report;

use clap::{Parser, Subcommand};

pub use self::report::{ReportArgs, report};
use crate::core::baseline::BaselineAllocation;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare the rate plans against an interval usage export.
    #[clap(name = "report")]
    Report(Box<ReportArgs>),
}

#[derive(Copy, Clone, Parser)]
pub struct BaselineArgs {
    /// Add the medical baseline allocation on top of the seasonal one.
    #[clap(long = "use-medical-baseline", env = "USE_MEDICAL_BASELINE")]
    pub use_medical_baseline: bool,
}

impl From<BaselineArgs> for BaselineAllocation {
    fn from(args: BaselineArgs) -> Self {
        Self::builder().medical(args.use_medical_baseline).build()
    }
}

#[derive(Copy, Clone, Default, clap::ValueEnum)]
pub enum InputFormat {
    /// SCE «Green Button» interval usage export.
    #[default]
    #[value(name = "greenbutton")]
    GreenButton,

    /// Sense monitor hourly export with the `mains` and `solar` devices.
    #[value(name = "sense")]
    Sense,
}

#[derive(Copy, Clone, Default, clap::ValueEnum)]
pub enum Format {
    /// Human-readable tables.
    #[default]
    Table,

    /// Single JSON document.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tariff::TariffPlan;

    #[test]
    fn test_parse_report() {
        let args = Args::try_parse_from([
            "greenbutton-tariffs",
            "report",
            "--input-file",
            "usage.csv",
            "--plans",
            "domestic,tou-d-5-8pm",
            "--use-medical-baseline",
        ])
        .unwrap();
        let Command::Report(args) = args.command;
        assert_eq!(args.plans(), TariffPlan::DomesticTiered | TariffPlan::TouFiveToEight);
        assert!(args.baseline.use_medical_baseline);
        assert!(matches!(args.format, Format::Table));
        assert!(matches!(args.input_format, InputFormat::GreenButton));
        assert!(!args.hourly_profile);
    }

    #[test]
    fn test_all_plans_by_default() {
        let args = Args::try_parse_from([
            "greenbutton-tariffs",
            "report",
            "--input-file",
            "usage.csv",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Report(args) = args.command;
        assert_eq!(args.plans().len(), 4);
        assert!(matches!(args.format, Format::Json));
    }

    #[test]
    fn test_parse_sense_input() {
        let args = Args::try_parse_from([
            "greenbutton-tariffs",
            "report",
            "--input-file",
            "sense.csv",
            "--input-format",
            "sense",
        ])
        .unwrap();
        let Command::Report(args) = args.command;
        assert!(matches!(args.input_format, InputFormat::Sense));
    }
}
