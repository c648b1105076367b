use std::fmt::{Display, Formatter};

use crate::core::calendar::Season;

/// Time-of-day pricing tier, regardless of the season.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Peak {
    SuperOffPeak,
    OffPeak,
    MidPeak,
    OnPeak,
}

/// Season and time-of-day bucket with its own unit price.
#[derive(Debug, Ord, PartialOrd, Hash, enumset::EnumSetType, serde::Serialize)]
pub enum CostPeriod {
    SummerSuperOffPeak,
    SummerOffPeak,
    SummerMidPeak,
    SummerOnPeak,
    WinterSuperOffPeak,
    WinterOffPeak,
    WinterMidPeak,
    WinterOnPeak,
}

impl CostPeriod {
    #[must_use]
    pub const fn new(season: Season, peak: Peak) -> Self {
        match (season, peak) {
            (Season::Summer, Peak::SuperOffPeak) => Self::SummerSuperOffPeak,
            (Season::Summer, Peak::OffPeak) => Self::SummerOffPeak,
            (Season::Summer, Peak::MidPeak) => Self::SummerMidPeak,
            (Season::Summer, Peak::OnPeak) => Self::SummerOnPeak,
            (Season::Winter, Peak::SuperOffPeak) => Self::WinterSuperOffPeak,
            (Season::Winter, Peak::OffPeak) => Self::WinterOffPeak,
            (Season::Winter, Peak::MidPeak) => Self::WinterMidPeak,
            (Season::Winter, Peak::OnPeak) => Self::WinterOnPeak,
        }
    }

    #[must_use]
    pub const fn season(self) -> Season {
        match self {
            Self::SummerSuperOffPeak
            | Self::SummerOffPeak
            | Self::SummerMidPeak
            | Self::SummerOnPeak => Season::Summer,
            Self::WinterSuperOffPeak
            | Self::WinterOffPeak
            | Self::WinterMidPeak
            | Self::WinterOnPeak => Season::Winter,
        }
    }

    #[must_use]
    pub const fn peak(self) -> Peak {
        match self {
            Self::SummerSuperOffPeak | Self::WinterSuperOffPeak => Peak::SuperOffPeak,
            Self::SummerOffPeak | Self::WinterOffPeak => Peak::OffPeak,
            Self::SummerMidPeak | Self::WinterMidPeak => Peak::MidPeak,
            Self::SummerOnPeak | Self::WinterOnPeak => Peak::OnPeak,
        }
    }
}

impl Display for Peak {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperOffPeak => write!(f, "Super Off-Peak"),
            Self::OffPeak => write!(f, "Off-Peak"),
            Self::MidPeak => write!(f, "Mid-Peak"),
            Self::OnPeak => write!(f, "On-Peak"),
        }
    }
}

impl Display for CostPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.peak(), self.season())
    }
}
