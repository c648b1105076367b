//! Folding raw readings into hour, day, and month buckets.
//!
//! Every level groups through an ordered map keyed by the truncated bucket, so the output is
//! chronological regardless of the input order.

mod day;
mod hour;
mod month;

pub use self::{
    day::{UsageDay, split_by_day},
    hour::{UsageHour, aggregate_into_hours, truncate_to_hour},
    month::{UsageMonth, split_by_month, truncate_to_month},
};
