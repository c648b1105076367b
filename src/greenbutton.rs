//! SCE "Green Button" interval usage export.
//!
//! The export interleaves free-text preamble lines and repeated column headers with the data rows:
//!
//! ```text
//! "Data for period starting: 2017-08-31 00:00:00  for 24 hours"
//! Energy consumption time period,Usage(Real energy in kilowatt-hours),Reading quality
//! "2017-08-31 00:00:00 to 2017-08-31 01:00:00","0.610",""
//! ```
//!
//! Only the data rows are kept. The rows that look like data but cannot be parsed are skipped with
//! a warning, they never fail the entire file.

use std::{fs::File, io::Read, path::Path};

use chrono::{NaiveDateTime, TimeZone, Utc};
use csv::{ByteRecord, ReaderBuilder};

use crate::{
    core::{Timestamp, reading::IntervalReading},
    prelude::*,
    quantity::energy::KilowattHours,
};

const HEADER: &str = "Energy consumption time period";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_file(path: &Path) -> Result<Vec<IntervalReading>> {
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    read(file).with_context(|| format!("failed to read `{}`", path.display()))
}

pub fn read(reader: impl Read) -> Result<Vec<IntervalReading>> {
    let mut reader = ReaderBuilder::new().has_headers(false).flexible(true).from_reader(reader);
    let mut readings = Vec::new();
    let mut n_skipped = 0_usize;
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() != 3 {
            trace!(line, n_fields = record.len(), "skipping a non-data line");
            continue;
        }
        if record.get(0).is_some_and(|field| field.starts_with(HEADER.as_bytes())) {
            continue;
        }
        match parse_record(&record) {
            Ok(reading) => readings.push(reading),
            Err(error) => {
                warn!(line, "skipping a malformed row: {error:#}");
                n_skipped += 1;
            }
        }
    }
    info!(n_readings = readings.len(), n_skipped, "read the usage export");
    Ok(readings)
}

fn parse_record(record: &ByteRecord) -> Result<IntervalReading> {
    let field = |index: usize| String::from_utf8_lossy(record.get(index).unwrap_or_default());

    let period = field(0);
    let (start_time, end_time) = parse_period(&period)?;
    let duration = end_time - start_time;
    ensure!(
        duration == IntervalReading::FIFTEEN_MINUTES || duration == IntervalReading::ONE_HOUR,
        "expected a 15-minute or 1-hour interval, got {duration}"
    );
    let usage = field(1);
    let usage = usage
        .trim()
        .parse::<KilowattHours>()
        .with_context(|| format!("invalid usage `{usage}`"))?;
    ensure!(usage.0.is_finite(), "non-finite usage `{usage}`");

    Ok(IntervalReading::builder()
        .start_time(start_time)
        .end_time(end_time)
        .usage(usage)
        .quality(field(2).trim())
        .build())
}

/// Parse `2017-08-31 00:00:00 to 2017-08-31 01:00:00`, where the separator may start with a
/// non-breaking space.
fn parse_period(period: &str) -> Result<(Timestamp, Timestamp)> {
    let (start, end) = period
        .split_once("to ")
        .with_context(|| format!("expected a time period, got `{period}`"))?;
    let start =
        start.trim_end_matches(|c: char| c.is_whitespace() || c == char::REPLACEMENT_CHARACTER);
    Ok((parse_time(start)?, parse_time(end.trim())?))
}

/// The export carries no offset, the wall-clock time is taken as UTC.
pub(crate) fn parse_time(time: &str) -> Result<Timestamp> {
    let time = NaiveDateTime::parse_from_str(time, TIME_FORMAT)
        .with_context(|| format!("invalid timestamp `{time}`"))?;
    Ok(Utc.from_utc_datetime(&time).fixed_offset())
}
