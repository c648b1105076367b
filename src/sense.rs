//! Sense home energy monitor export.
//!
//! One row per device and interval, preceded by an optional `#` disclaimer:
//!
//! ```text
//! DateTime,Device ID,Name,Device Type,Device Make,Device Model,Device Location,Avg Wattage,kWh
//! 2020-01-01 00:00:00,mains,Total Usage,,,,,812.000,0.812
//! 2020-01-01 00:00:00,solar,Solar Production,,,,,-120.000,-0.120
//! ```
//!
//! The `mains` device is the total consumption, and the `solar` device is the production with a
//! negative sign. Their sum is the net usage metered by the utility. The hourly export is expected.

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, Trim};
use itertools::Itertools;
use serde::{Deserialize, Deserializer};

use crate::{
    core::{Timestamp, reading::IntervalReading},
    greenbutton::parse_time,
    prelude::*,
    quantity::energy::KilowattHours,
};

const MAINS: &str = "mains";

const SOLAR: &str = "solar";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SenseRow {
    #[serde(rename = "DateTime", deserialize_with = "deserialize_timestamp")]
    pub timestamp: Timestamp,

    #[serde(rename = "Device ID")]
    pub device_id: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Device Type")]
    pub device_type: String,

    #[serde(rename = "Device Make")]
    pub device_make: String,

    #[serde(rename = "Device Model")]
    pub device_model: String,

    #[serde(rename = "Device Location")]
    pub device_location: String,

    /// Watts.
    #[serde(rename = "Avg Wattage")]
    pub average_power: f64,

    #[serde(rename = "kWh")]
    pub energy: KilowattHours,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let time = String::deserialize(deserializer)?;
    parse_time(&time).map_err(|error| serde::de::Error::custom(format!("{error:#}")))
}

/// Grid-side view of a single interval.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub timestamp: Timestamp,

    /// Negative when the panels produce.
    pub production: Option<KilowattHours>,

    pub consumption: Option<KilowattHours>,
}

impl Snapshot {
    /// Energy drawn from the grid, or `None` when the mains reading is missing.
    ///
    /// Missing production means no solar installed.
    #[must_use]
    pub fn net_usage(&self) -> Option<KilowattHours> {
        Some(self.consumption? + self.production.unwrap_or(KilowattHours::ZERO))
    }

    /// Hour-long reading of the net usage.
    #[must_use]
    pub fn to_reading(self) -> Option<IntervalReading> {
        Some(
            IntervalReading::builder()
                .start_time(self.timestamp)
                .end_time(self.timestamp + IntervalReading::ONE_HOUR)
                .usage(self.net_usage()?)
                .build(),
        )
    }
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_file(path: &Path) -> Result<Vec<IntervalReading>> {
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    read(file).with_context(|| format!("failed to read `{}`", path.display()))
}

/// Read the export into hourly net usage readings, sorted chronologically.
pub fn read(reader: impl Read) -> Result<Vec<IntervalReading>> {
    let rows = parse(reader)?;
    let n_rows = rows.len();
    let mut n_skipped = 0_usize;
    let readings = group_by_time(rows)
        .into_iter()
        .filter_map(|snapshot| {
            let reading = snapshot.to_reading();
            if reading.is_none() {
                warn!(timestamp = %snapshot.timestamp, "skipping a snapshot without `{MAINS}`");
                n_skipped += 1;
            }
            reading
        })
        .collect_vec();
    info!(n_rows, n_readings = readings.len(), n_skipped, "read the Sense export");
    Ok(readings)
}

/// Parse the rows as is. Any malformed row fails the entire export.
pub fn parse(reader: impl Read) -> Result<Vec<SenseRow>> {
    let rows = ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(reader)
        .deserialize::<SenseRow>()
        .collect::<Result<Vec<_>, _>>()
        .context("malformed Sense export")?;
    for row in &rows {
        ensure!(
            row.energy.0.is_finite(),
            "non-finite energy `{}` of `{}` at {}",
            row.energy,
            row.device_id,
            row.timestamp
        );
    }
    Ok(rows)
}

/// Group the rows by the device, keeping the original order within each device.
#[must_use]
pub fn group_by_device(rows: Vec<SenseRow>) -> HashMap<String, Vec<SenseRow>> {
    rows.into_iter().into_group_map_by(|row| row.device_id.clone())
}

/// Fold the rows into per-interval snapshots, sorted chronologically.
pub fn group_by_time(rows: Vec<SenseRow>) -> Vec<Snapshot> {
    rows.into_iter()
        .into_group_map_by(|row| row.timestamp)
        .into_iter()
        .sorted_by_key(|(timestamp, _)| *timestamp)
        .map(|(timestamp, rows)| Snapshot {
            timestamp,
            production: find_energy(SOLAR, &rows),
            consumption: find_energy(MAINS, &rows),
        })
        .collect()
}

/// The last reading of the device wins.
fn find_energy(device_id: &str, rows: &[SenseRow]) -> Option<KilowattHours> {
    let mut found = None;
    for row in rows.iter().filter(|row| row.device_id == device_id) {
        if found.is_some() {
            warn!(device_id, timestamp = %row.timestamp, "duplicate device within the interval");
        }
        found = Some(row.energy);
    }
    found
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::window::{aggregate_into_hours, split_by_day, tests::timestamp};

    const HEADER: &str = "DateTime,Device ID,Name,Device Type,Device Make,Device Model,Device \
                          Location,Avg Wattage,kWh\n";

    fn row(device_id: &str, energy: f64, timestamp: Timestamp) -> SenseRow {
        SenseRow {
            timestamp,
            device_id: device_id.to_string(),
            name: String::new(),
            device_type: String::new(),
            device_make: String::new(),
            device_model: String::new(),
            device_location: String::new(),
            average_power: energy * 1000.0,
            energy: KilowattHours::new(energy),
        }
    }

    #[test]
    fn test_parse_real_sample() {
        let sample = format!(
            "# Please note that there may be discrepancies between your electric bill and what \
             Sense reports\n{HEADER}2020-01-01 00:00:00,3a9fb50e,Amy’s nightstand,Light,Signify \
             Netherlands B.V.,LCT014,Amy’s bedroom,3.497,0.003\n2020-01-01 \
             00:00:00,63ac628e,Dryer,Dryer,,,,66.569,0.067"
        );
        let rows = parse(sample.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Amy’s nightstand");
        assert_eq!(rows[1].device_make, "");
    }

    #[test]
    fn test_parse_date() {
        let sample = format!("{HEADER}2020-01-01 00:00:00,63ac628e,Dryer,Dryer,,,,66.569,0.067");
        let rows = parse(sample.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].timestamp, timestamp(2020, 1, 1, 0, 0));
    }

    #[test]
    fn test_parse_power_and_energy() {
        let sample = format!("{HEADER}2020-01-01 00:00:00,63ac628e,Dryer,Dryer,,,,66.569,0.067");
        let rows = parse(sample.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_abs_diff_eq!(rows[0].average_power, 66.569);
        assert_abs_diff_eq!(rows[0].energy.0, 0.067);
    }

    #[test]
    fn test_missing_columns_fail() {
        let sample = format!("\n{HEADER}2020-01-01 00:00:00,63ac628e");
        let error = parse(sample.as_bytes()).unwrap_err();
        assert!(format!("{error:#}").contains("fields"), "{error:#}");
    }

    #[test]
    fn test_invalid_date_fails() {
        let sample = format!("{HEADER}2020-01-01T00:00,63ac628e,Dryer,Dryer,,,,66.569,0.067");
        let error = parse(sample.as_bytes()).unwrap_err();
        assert!(format!("{error:#}").contains("invalid timestamp"), "{error:#}");
    }

    #[test]
    fn test_non_finite_energy_fails() {
        let sample = format!("{HEADER}2020-01-01 00:00:00,mains,Total,,,,,NaN,NaN");
        assert!(parse(sample.as_bytes()).is_err());
    }

    #[test]
    fn test_group_by_device_keeps_same_id_together() {
        let t0 = timestamp(2020, 1, 1, 0, 0);
        let rows = vec![row("abc", 10.0, t0), row("abc", 5.0, t0)];
        let groups = group_by_device(rows.clone());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["abc"], rows);
    }

    #[test]
    fn test_group_by_device_splits_different_ids() {
        let t0 = timestamp(2020, 1, 1, 0, 0);
        let rows = vec![row("abc", 10.0, t0), row("def", 5.0, t0)];
        let groups = group_by_device(rows.clone());
        assert_eq!(groups["abc"], [rows[0].clone()]);
        assert_eq!(groups["def"], [rows[1].clone()]);
    }

    #[test]
    fn test_group_by_time_same_time() {
        let t0 = timestamp(2020, 1, 1, 0, 0);
        let snapshots = group_by_time(vec![row(MAINS, 10.0, t0), row(SOLAR, -5.0, t0)]);
        assert_eq!(snapshots.len(), 1);
    }

    #[test]
    fn test_group_by_time_different_times() {
        let t0 = timestamp(2020, 1, 1, 0, 0);
        let t1 = timestamp(2020, 1, 1, 1, 0);
        let snapshots = group_by_time(vec![
            row(MAINS, 10.0, t1),
            row(SOLAR, -5.0, t1),
            row(MAINS, 10.0, t0),
            row(SOLAR, -5.0, t0),
        ]);
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].timestamp, t0);
        assert_eq!(snapshots[1].timestamp, t1);
    }

    #[test]
    fn test_group_by_time_picks_production_and_consumption() {
        let t0 = timestamp(2020, 1, 1, 0, 0);
        let snapshots = group_by_time(vec![
            row(MAINS, 10.0, t0),
            row("63ac628e", 3.0, t0),
            row(SOLAR, -5.0, t0),
        ]);
        assert_eq!(snapshots.len(), 1);
        assert_abs_diff_eq!(snapshots[0].production.unwrap().0, -5.0);
        assert_abs_diff_eq!(snapshots[0].consumption.unwrap().0, 10.0);
        assert_abs_diff_eq!(snapshots[0].net_usage().unwrap().0, 5.0);
    }

    #[test]
    fn test_duplicate_device_keeps_last() {
        let t0 = timestamp(2020, 1, 1, 0, 0);
        let snapshots = group_by_time(vec![row(MAINS, 10.0, t0), row(MAINS, 7.0, t0)]);
        assert_abs_diff_eq!(snapshots[0].consumption.unwrap().0, 7.0);
    }

    #[test]
    fn test_net_usage_without_solar() {
        let snapshot = Snapshot {
            timestamp: timestamp(2020, 1, 1, 0, 0),
            production: None,
            consumption: Some(KilowattHours::new(2.5)),
        };
        assert_abs_diff_eq!(snapshot.net_usage().unwrap().0, 2.5);
    }

    #[test]
    fn test_net_usage_without_mains() {
        let snapshot = Snapshot {
            timestamp: timestamp(2020, 1, 1, 0, 0),
            production: Some(KilowattHours::new(-1.0)),
            consumption: None,
        };
        assert!(snapshot.net_usage().is_none());
        assert!(snapshot.to_reading().is_none());
    }

    #[test]
    fn test_read_into_hours_and_days() {
        let sample = format!(
            "{HEADER}2020-01-01 01:00:00,mains,Total Usage,,,,,1000.0,1.0\n2020-01-01 \
             01:00:00,solar,Solar Production,,,,,-3000.0,-3.0\n2020-01-01 \
             00:00:00,mains,Total Usage,,,,,2000.0,2.0\n2020-01-01 \
             00:00:00,63ac628e,Dryer,Dryer,,,,500.0,0.5\n2020-01-01 \
             02:00:00,solar,Solar Production,,,,,-1000.0,-1.0\n"
        );
        let readings = read(sample.as_bytes()).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].start_time, timestamp(2020, 1, 1, 0, 0));
        assert_eq!(readings[0].duration(), IntervalReading::ONE_HOUR);
        assert_abs_diff_eq!(readings[0].usage.0, 2.0);
        assert_abs_diff_eq!(readings[1].usage.0, -2.0);

        let hours = aggregate_into_hours(&readings).unwrap();
        assert_eq!(hours.len(), 2);
        let days = split_by_day(hours).unwrap();
        assert_eq!(days.len(), 1);
        assert_abs_diff_eq!(days[0].usage().0, 0.0);
    }
}
