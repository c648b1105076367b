//! Southern California Edison residential rate plans.

use std::fmt::{Display, Formatter};

use chrono::{Datelike, Timelike};
use enumset::EnumSet;

use crate::{
    core::{
        Timestamp,
        calendar::{Season, is_summer_month, is_weekday},
        error::{Error, Result},
        period::{CostPeriod, Peak},
    },
    quantity::rate::{DailyRate, KilowattHourRate},
};

#[derive(Debug, Ord, PartialOrd, Hash, clap::ValueEnum, enumset::EnumSetType, serde::Serialize)]
pub enum TariffPlan {
    /// Tiered domestic plan without the time-of-use split.
    #[value(name = "domestic")]
    #[serde(rename = "DOMESTIC")]
    DomesticTiered,

    /// TOU-D-A: weekday 2–8 PM on-peak all year round.
    #[value(name = "tou-d-a")]
    #[serde(rename = "TOU-D-A")]
    TouStandard,

    /// TOU-D-PRIME: summer weekday 4–9 PM on-peak, mid-peak otherwise within the same window.
    #[value(name = "tou-d-prime")]
    #[serde(rename = "TOU-D-PRIME")]
    TouPrime,

    /// TOU-D-5-8PM: summer weekday 5–8 PM on-peak, mid-peak otherwise within the same window.
    #[value(name = "tou-d-5-8pm")]
    #[serde(rename = "TOU-D-5-8PM")]
    TouFiveToEight,
}

impl Display for TariffPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomesticTiered => write!(f, "DOMESTIC"),
            Self::TouStandard => write!(f, "TOU-D-A"),
            Self::TouPrime => write!(f, "TOU-D-PRIME"),
            Self::TouFiveToEight => write!(f, "TOU-D-5-8PM"),
        }
    }
}

impl TariffPlan {
    /// Plans that split the day into time-of-use periods.
    #[must_use]
    pub fn time_of_use() -> EnumSet<Self> {
        Self::TouStandard | Self::TouPrime | Self::TouFiveToEight
    }

    #[must_use]
    pub fn is_on_peak(self, timestamp: Timestamp) -> bool {
        match self {
            Self::DomesticTiered => false,
            Self::TouStandard => is_weekday(timestamp) && is_between(timestamp, 14, 20),
            Self::TouPrime | Self::TouFiveToEight => {
                is_summer_weekday(timestamp) && self.is_within_peak_window(timestamp)
            }
        }
    }

    #[must_use]
    pub fn is_mid_peak(self, timestamp: Timestamp) -> bool {
        match self {
            Self::DomesticTiered | Self::TouStandard => false,
            Self::TouPrime | Self::TouFiveToEight => {
                self.is_within_peak_window(timestamp) && !is_summer_weekday(timestamp)
            }
        }
    }

    #[must_use]
    pub fn is_off_peak(self, timestamp: Timestamp) -> bool {
        match self {
            Self::DomesticTiered => true,
            Self::TouStandard => is_between(timestamp, 8, 22) && !self.is_on_peak(timestamp),
            Self::TouPrime | Self::TouFiveToEight => {
                !self.is_within_peak_window(timestamp) && !self.is_super_off_peak(timestamp)
            }
        }
    }

    #[must_use]
    pub fn is_super_off_peak(self, timestamp: Timestamp) -> bool {
        match self {
            Self::DomesticTiered => false,
            Self::TouStandard => !self.is_on_peak(timestamp) && !self.is_off_peak(timestamp),
            Self::TouPrime => !is_summer_month(timestamp.month()) && is_between(timestamp, 8, 16),
            Self::TouFiveToEight => {
                !is_summer_month(timestamp.month()) && is_between(timestamp, 8, 17)
            }
        }
    }

    /// Classify the hour into its cost period.
    ///
    /// Exactly one of the peak predicates must hold, anything else is a classifier fault.
    pub fn classify(self, timestamp: Timestamp) -> Result<CostPeriod> {
        let matches = [
            (Peak::OnPeak, self.is_on_peak(timestamp)),
            (Peak::MidPeak, self.is_mid_peak(timestamp)),
            (Peak::OffPeak, self.is_off_peak(timestamp)),
            (Peak::SuperOffPeak, self.is_super_off_peak(timestamp)),
        ];
        let mut peaks =
            matches.into_iter().filter_map(|(peak, is_matched)| is_matched.then_some(peak));
        match (peaks.next(), peaks.next()) {
            (Some(peak), None) => Ok(CostPeriod::new(Season::of(timestamp), peak)),
            _ => Err(Error::PeriodPartition {
                plan: self,
                timestamp,
                n_matches: matches.iter().filter(|(_, is_matched)| *is_matched).count(),
            }),
        }
    }

    /// Unit price of the period.
    pub fn cost(self, period: CostPeriod) -> Result<KilowattHourRate> {
        self.rate(period)
            .map(KilowattHourRate::new)
            .ok_or(Error::InvalidPeriod { plan: self, period })
    }

    /// Periods the plan is able to produce and price.
    #[must_use]
    pub fn periods(self) -> EnumSet<CostPeriod> {
        EnumSet::all().iter().filter(|period| self.rate(*period).is_some()).collect()
    }

    #[must_use]
    pub const fn daily_basic_charge(self) -> DailyRate {
        match self {
            Self::DomesticTiered | Self::TouStandard => DailyRate::new(0.031),
            Self::TouPrime => DailyRate::new(0.40),
            Self::TouFiveToEight => DailyRate::new(0.03),
        }
    }

    #[must_use]
    pub const fn minimum_daily_charge(self) -> DailyRate {
        match self {
            Self::DomesticTiered | Self::TouStandard | Self::TouFiveToEight => {
                DailyRate::new(0.35)
            }
            Self::TouPrime => DailyRate::ZERO,
        }
    }

    #[must_use]
    pub const fn has_baseline_allocation(self) -> bool {
        !matches!(self, Self::TouPrime)
    }

    /// Dollars per kWh, [`None`] for the periods the plan never produces.
    const fn rate(self, period: CostPeriod) -> Option<f64> {
        use CostPeriod::{
            SummerMidPeak,
            SummerOffPeak,
            SummerOnPeak,
            SummerSuperOffPeak,
            WinterMidPeak,
            WinterOffPeak,
            WinterOnPeak,
            WinterSuperOffPeak,
        };

        match (self, period) {
            (Self::DomesticTiered, SummerOffPeak | WinterOffPeak) => Some(0.23),

            (Self::TouStandard, SummerSuperOffPeak | WinterSuperOffPeak) => Some(0.16),
            (Self::TouStandard, SummerOffPeak) => Some(0.34),
            (Self::TouStandard, SummerOnPeak) => Some(0.61),
            (Self::TouStandard, WinterOffPeak) => Some(0.30),
            (Self::TouStandard, WinterOnPeak) => Some(0.40),

            (Self::TouPrime, SummerOffPeak) => Some(0.17),
            (Self::TouPrime, SummerMidPeak) => Some(0.33),
            (Self::TouPrime, SummerOnPeak) => Some(0.44),
            (Self::TouPrime, WinterSuperOffPeak | WinterOffPeak) => Some(0.16),
            (Self::TouPrime, WinterMidPeak) => Some(0.41),

            (Self::TouFiveToEight, SummerOffPeak) => Some(0.27),
            (Self::TouFiveToEight, SummerMidPeak) => Some(0.40),
            (Self::TouFiveToEight, SummerOnPeak) => Some(0.54),
            (Self::TouFiveToEight, WinterSuperOffPeak) => Some(0.25),
            (Self::TouFiveToEight, WinterOffPeak) => Some(0.29),
            (Self::TouFiveToEight, WinterMidPeak) => Some(0.44),

            _ => None,
        }
    }

    /// Evening window in which the on- and mid-peak periods live.
    fn is_within_peak_window(self, timestamp: Timestamp) -> bool {
        match self {
            Self::TouPrime => is_between(timestamp, 16, 21),
            Self::TouFiveToEight => is_between(timestamp, 17, 20),
            Self::DomesticTiered | Self::TouStandard => false,
        }
    }
}

/// Start hour inclusive, end hour exclusive.
fn is_between(timestamp: Timestamp, start_hour: u32, end_hour: u32) -> bool {
    (start_hour..end_hour).contains(&timestamp.hour())
}

fn is_summer_weekday(timestamp: Timestamp) -> bool {
    is_summer_month(timestamp.month()) && is_weekday(timestamp)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, TimeDelta};

    use super::*;
    use crate::core::{
        period::CostPeriod::{
            SummerMidPeak as SMP,
            SummerOffPeak as SOP,
            SummerOnPeak as SON,
            SummerSuperOffPeak as SSO,
            WinterMidPeak as WMP,
            WinterOffPeak as WOP,
            WinterOnPeak as WON,
            WinterSuperOffPeak as WSO,
        },
        window::tests::timestamp,
    };

    fn assert_hourly_periods(plan: TariffPlan, day: Timestamp, expected: [CostPeriod; 24]) {
        for (hour, expected) in expected.into_iter().enumerate() {
            let timestamp = day + TimeDelta::hours(hour as i64);
            assert_eq!(plan.classify(timestamp).unwrap(), expected, "hour {hour}");
        }
    }

    #[test]
    fn test_tou_d_a_summer_weekday() {
        // Monday, August 3, 2020.
        #[rustfmt::skip]
        let expected = [
            SSO, SSO, SSO, SSO, SSO, SSO, SSO, SSO,
            SOP, SOP, SOP, SOP, SOP, SOP,
            SON, SON, SON, SON, SON, SON,
            SOP, SOP,
            SSO, SSO,
        ];
        assert_hourly_periods(TariffPlan::TouStandard, timestamp(2020, 8, 3, 0, 0), expected);
    }

    #[test]
    fn test_tou_d_a_summer_weekend() {
        // Saturday, August 1, 2020.
        #[rustfmt::skip]
        let expected = [
            SSO, SSO, SSO, SSO, SSO, SSO, SSO, SSO,
            SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP,
            SSO, SSO,
        ];
        assert_hourly_periods(TariffPlan::TouStandard, timestamp(2020, 8, 1, 0, 0), expected);
    }

    #[test]
    fn test_tou_d_a_winter_weekday() {
        // Friday, December 4, 2020.
        #[rustfmt::skip]
        let expected = [
            WSO, WSO, WSO, WSO, WSO, WSO, WSO, WSO,
            WOP, WOP, WOP, WOP, WOP, WOP,
            WON, WON, WON, WON, WON, WON,
            WOP, WOP,
            WSO, WSO,
        ];
        assert_hourly_periods(TariffPlan::TouStandard, timestamp(2020, 12, 4, 0, 0), expected);
    }

    #[test]
    fn test_tou_d_a_winter_weekend() {
        // Saturday, December 5, 2020.
        #[rustfmt::skip]
        let expected = [
            WSO, WSO, WSO, WSO, WSO, WSO, WSO, WSO,
            WOP, WOP, WOP, WOP, WOP, WOP, WOP, WOP, WOP, WOP, WOP, WOP, WOP, WOP,
            WSO, WSO,
        ];
        assert_hourly_periods(TariffPlan::TouStandard, timestamp(2020, 12, 5, 0, 0), expected);
    }

    #[test]
    fn test_tou_d_a_holiday_has_no_on_peak() {
        // Monday, January 18, 2021.
        let holiday = timestamp(2021, 1, 18, 15, 0);
        assert!(!TariffPlan::TouStandard.is_on_peak(holiday));
        assert_eq!(TariffPlan::TouStandard.classify(holiday).unwrap(), WOP);
    }

    #[test]
    fn test_tou_d_prime_summer_weekday() {
        #[rustfmt::skip]
        let expected = [
            SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP,
            SON, SON, SON, SON, SON,
            SOP, SOP, SOP,
        ];
        assert_hourly_periods(TariffPlan::TouPrime, timestamp(2020, 8, 3, 0, 0), expected);
    }

    #[test]
    fn test_tou_d_prime_summer_weekend() {
        #[rustfmt::skip]
        let expected = [
            SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP,
            SMP, SMP, SMP, SMP, SMP,
            SOP, SOP, SOP,
        ];
        assert_hourly_periods(TariffPlan::TouPrime, timestamp(2020, 8, 1, 0, 0), expected);
    }

    #[test]
    fn test_tou_d_prime_winter_weekday() {
        #[rustfmt::skip]
        let expected = [
            WOP, WOP, WOP, WOP, WOP, WOP, WOP, WOP,
            WSO, WSO, WSO, WSO, WSO, WSO, WSO, WSO,
            WMP, WMP, WMP, WMP, WMP,
            WOP, WOP, WOP,
        ];
        assert_hourly_periods(TariffPlan::TouPrime, timestamp(2020, 12, 4, 0, 0), expected);
    }

    #[test]
    fn test_tou_d_5_8_summer_weekday() {
        #[rustfmt::skip]
        let expected = [
            SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP, SOP,
            SON, SON, SON,
            SOP, SOP, SOP, SOP,
        ];
        assert_hourly_periods(TariffPlan::TouFiveToEight, timestamp(2020, 8, 3, 0, 0), expected);
    }

    #[test]
    fn test_tou_d_5_8_winter_weekend() {
        #[rustfmt::skip]
        let expected = [
            WOP, WOP, WOP, WOP, WOP, WOP, WOP, WOP,
            WSO, WSO, WSO, WSO, WSO, WSO, WSO, WSO, WSO,
            WMP, WMP, WMP,
            WOP, WOP, WOP, WOP,
        ];
        assert_hourly_periods(TariffPlan::TouFiveToEight, timestamp(2020, 12, 5, 0, 0), expected);
    }

    #[test]
    fn test_domestic_is_always_off_peak() {
        assert_eq!(TariffPlan::DomesticTiered.classify(timestamp(2020, 8, 3, 15, 0)).unwrap(), SOP);
        assert_eq!(TariffPlan::DomesticTiered.classify(timestamp(2020, 12, 5, 3, 0)).unwrap(), WOP);
    }

    /// Every hour of a leap year falls into exactly one period the plan can price.
    #[test]
    fn test_predicates_partition_the_year() {
        let start = timestamp(2020, 1, 1, 0, 0);
        for plan in EnumSet::<TariffPlan>::all() {
            for hour in 0..(366 * 24) {
                let timestamp = start + TimeDelta::hours(hour);
                let period = plan.classify(timestamp).unwrap();
                assert!(plan.periods().contains(period), "{plan} at {timestamp}: {period}");
                assert!(plan.cost(period).is_ok());
                assert_eq!(period.season(), Season::of_month(timestamp.month()));
            }
        }
    }

    #[test]
    fn test_invalid_period() {
        let error = TariffPlan::TouStandard.cost(SMP).unwrap_err();
        assert!(matches!(
            error,
            Error::InvalidPeriod { plan: TariffPlan::TouStandard, period: SMP }
        ));
        assert!(error.is_internal());
        assert!(TariffPlan::TouPrime.cost(SSO).is_err());
        assert!(TariffPlan::TouPrime.cost(WON).is_err());
        assert!(TariffPlan::TouFiveToEight.cost(WON).is_err());
    }

    #[test]
    fn test_periods() {
        assert_eq!(TariffPlan::TouStandard.periods(), SSO | SOP | SON | WSO | WOP | WON);
        assert_eq!(TariffPlan::TouPrime.periods(), SOP | SMP | SON | WSO | WOP | WMP);
        assert_eq!(TariffPlan::TouFiveToEight.periods(), SOP | SMP | SON | WSO | WOP | WMP);
        assert_eq!(TariffPlan::DomesticTiered.periods(), SOP | WOP);
    }

    #[test]
    fn test_charges() {
        assert!(TariffPlan::TouStandard.has_baseline_allocation());
        assert!(!TariffPlan::TouPrime.has_baseline_allocation());
        assert_eq!(TariffPlan::TouPrime.minimum_daily_charge(), DailyRate::ZERO);
        assert_eq!(TariffPlan::TouFiveToEight.daily_basic_charge(), DailyRate::new(0.03));
    }

    #[test]
    fn test_time_of_use_plans() {
        assert!(!TariffPlan::time_of_use().contains(TariffPlan::DomesticTiered));
        assert_eq!(TariffPlan::time_of_use().len(), 3);
        assert_eq!(timestamp(2020, 8, 3, 0, 0).weekday(), chrono::Weekday::Mon);
    }
}
