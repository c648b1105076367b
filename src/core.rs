pub mod baseline;
pub mod billing;
pub mod calendar;
pub mod domestic;
pub mod error;
pub mod period;
pub mod profile;
pub mod reading;
pub mod tariff;
pub mod window;

/// Wall-clock instant with the offset it was recorded in.
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;
