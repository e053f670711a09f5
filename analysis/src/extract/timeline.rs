use super::{parse_grouped, ExtractError};
use csv::{ReaderBuilder, StringRecord};
use std::{io::Read, path::Path};

pub const ELAPSED_COLUMN: &str = "elapsed_time_ms";
pub const EXECUTED_COLUMN: &str = "executed_count";
pub const TRACKING_COLUMN: &str = "Tracking";
pub const REPARTITIONING_COLUMN: &str = "Repartitioning";

/// Elapsed time rounded to 100ms, stored as a number of 100ms ticks
///
/// Samples of different repetitions are taken at slightly different offsets, the rounding aligns
/// them so they can be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeBucket(pub i64);

impl TimeBucket {
    /// Round the elapsed seconds to one decimal.
    ///
    /// Decimal formatting rounds the exact binary value and breaks exact ties to even, so 150ms
    /// lands in 0.1 (0.15 is stored slightly below) and 250ms in 0.2.
    pub fn from_millis(elapsed_ms: f64) -> Self {
        let seconds = elapsed_ms / 1000.0;
        let rounded: f64 = format!("{seconds:.1}").parse().unwrap_or(seconds);

        Self((rounded * 10.0).round() as i64)
    }

    pub fn seconds(self) -> f64 {
        self.0 as f64 / 10.0
    }
}

/// Throughput between two consecutive samples of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineSample {
    pub bucket: TimeBucket,
    pub throughput: f64,
    pub tracking: bool,
    pub repartitioning: bool,
}

#[derive(Debug)]
struct Columns {
    elapsed: usize,
    executed: usize,
    tracking: Option<usize>,
    repartitioning: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, ExtractError> {
        // later duplicates win
        let position = |name: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| *header == name)
                .last()
                .map(|(index, _)| index)
        };

        Ok(Self {
            elapsed: position(ELAPSED_COLUMN).ok_or(ExtractError::MissingColumn(ELAPSED_COLUMN))?,
            executed: position(EXECUTED_COLUMN)
                .ok_or(ExtractError::MissingColumn(EXECUTED_COLUMN))?,
            tracking: position(TRACKING_COLUMN),
            repartitioning: position(REPARTITIONING_COLUMN),
        })
    }
}

fn required<'r>(
    record: &'r StringRecord,
    index: usize,
    column: &'static str,
    number: usize,
) -> Result<&'r str, ExtractError> {
    record.get(index).ok_or(ExtractError::MissingValue {
        column,
        record: number,
    })
}

/// `x` in any case marks an active flag, everything else is inactive.
/// A row too short to reach the flag column reads as inactive rather than failing the file.
fn flag(record: &StringRecord, index: Option<usize>) -> bool {
    index
        .and_then(|index| record.get(index))
        .map_or(false, |value| value.trim().eq_ignore_ascii_case("x"))
}

/// read the throughput over time of a run from a headed result file
pub fn extract(path: &Path) -> Result<Vec<TimelineSample>, ExtractError> {
    read(ReaderBuilder::new().flexible(true).from_path(path)?)
}

pub fn read<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<TimelineSample>, ExtractError> {
    let columns = Columns::locate(reader.headers()?)?;
    let mut samples = Vec::new();
    let mut previous: Option<(f64, f64)> = None;

    for (number, record) in reader.records().enumerate() {
        let record = record?;
        let elapsed_ms = parse_grouped(
            ELAPSED_COLUMN,
            required(&record, columns.elapsed, ELAPSED_COLUMN, number)?,
        )?;
        let executed = parse_grouped(
            EXECUTED_COLUMN,
            required(&record, columns.executed, EXECUTED_COLUMN, number)?,
        )?;

        if let Some((previous_ms, previous_executed)) = previous {
            let delta_s = (elapsed_ms - previous_ms) / 1000.0;

            if delta_s > 0.0 {
                samples.push(TimelineSample {
                    bucket: TimeBucket::from_millis(elapsed_ms),
                    throughput: (executed - previous_executed) / delta_s,
                    tracking: flag(&record, columns.tracking),
                    repartitioning: flag(&record, columns.repartitioning),
                });
            }
        }

        previous = Some((elapsed_ms, executed));
    }

    Ok(samples)
}
