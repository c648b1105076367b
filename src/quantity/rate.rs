use std::fmt::{Debug, Display, Formatter};

use crate::quantity::{Quantity, cost::Cost};

/// Dollars per kilowatt-hour.
pub type KilowattHourRate = Quantity<f64, -1, -1, 1>;

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.5}/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}$/kWh", self.0)
    }
}

/// Dollars per billing day.
pub type DailyRate = Quantity<f64, 0, -1, 1>;

impl DailyRate {
    /// Total charge over the given number of billing days.
    pub fn over_days(self, n_days: usize) -> Cost {
        #[expect(clippy::cast_precision_loss)]
        Quantity(self.0 * n_days as f64)
    }
}

impl Display for DailyRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.3}/day", self.0)
    }
}

impl Debug for DailyRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}$/day", self.0)
    }
}
