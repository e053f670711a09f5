use crate::{
    aggregate::{SummaryAggregator, SummaryStats, TimelineAggregator},
    run_id::{ChartKey, ConfigKey, OutputKey},
};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create output directory {path:?}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path:?}")]
    Csv { path: PathBuf, source: csv::Error },
}

#[derive(Debug, Serialize)]
pub struct ThroughputRecord<'a> {
    pub workload: &'a str,
    pub workers: u32,
    pub storage_type: &'a str,
    pub partitions: u32,
    pub storage_engine: &'a str,
    pub paths: u32,
    pub interval: u32,
    pub ops_per_second: f64,
}

#[derive(Debug, Serialize)]
pub struct MakespanRecord<'a> {
    pub workload: &'a str,
    pub workers: u32,
    pub storage_type: &'a str,
    pub partitions: u32,
    pub storage_engine: &'a str,
    pub paths: u32,
    pub interval: u32,
    pub makespan_s: f64,
}

#[derive(Debug, Serialize)]
pub struct TimelineRecord<'a> {
    pub elapsed_s: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub tracking_prob: f64,
    pub repartitioning_prob: f64,
    pub storage_type: &'a str,
    pub partitions: u32,
    pub paths: u32,
    pub interval: u32,
    pub line_label: String,
}

impl<'a> ThroughputRecord<'a> {
    fn new(key: &'a ConfigKey, ops_per_second: f64) -> Self {
        Self {
            workload: &key.workload,
            workers: key.workers,
            storage_type: &key.storage_type,
            partitions: key.partitions,
            storage_engine: &key.storage_engine,
            paths: key.paths,
            interval: key.interval,
            ops_per_second,
        }
    }
}

impl<'a> MakespanRecord<'a> {
    fn new(key: &'a ConfigKey, makespan_s: f64) -> Self {
        Self {
            workload: &key.workload,
            workers: key.workers,
            storage_type: &key.storage_type,
            partitions: key.partitions,
            storage_engine: &key.storage_engine,
            paths: key.paths,
            interval: key.interval,
            makespan_s,
        }
    }
}

/// Write one csv file with a header derived from `S`, replacing an existing file
pub fn write_group<S, I>(dir: &Path, name: &str, records: I) -> Result<PathBuf, WriteError>
where
    S: Serialize,
    I: IntoIterator<Item = S>,
{
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(format!("{name}.csv"));
    let wrap = |source: csv::Error| WriteError::Csv {
        path: path.clone(),
        source,
    };

    let mut writer = csv::Writer::from_path(&path).map_err(wrap)?;
    for record in records {
        writer.serialize(record).map_err(wrap)?;
    }
    writer.flush().map_err(|error| wrap(error.into()))?;

    info!("Created {}", path.display());

    Ok(path)
}

/// summary row order inside an output file: workers, storage type, partitions
fn summary_order(a: &ConfigKey, b: &ConfigKey) -> std::cmp::Ordering {
    (a.workers, &a.storage_type, a.partitions)
        .cmp(&(b.workers, &b.storage_type, b.partitions))
        .then_with(|| a.cmp(b))
}

/// group configurations by workload and engine, each group sorted for output
fn by_output_key(
    aggregator: &SummaryAggregator,
) -> BTreeMap<OutputKey, Vec<(&ConfigKey, &SummaryStats)>> {
    let mut groups: BTreeMap<OutputKey, Vec<_>> = BTreeMap::new();

    for (key, stats) in aggregator.iter() {
        groups.entry(key.output_key()).or_default().push((key, stats));
    }

    for rows in groups.values_mut() {
        rows.sort_by(|(a, _), (b, _)| summary_order(a, b));
    }

    groups
}

/// one `<workload>__<engine>.csv` per group with the mean ops/second of every configuration
pub fn write_throughput(
    dir: &Path,
    aggregator: &SummaryAggregator,
) -> Result<Vec<PathBuf>, WriteError> {
    by_output_key(aggregator)
        .into_iter()
        .map(|(output_key, rows)| {
            write_group(
                dir,
                &output_key.to_string(),
                rows.into_iter().filter_map(|(key, stats)| {
                    stats
                        .ops_per_second
                        .value()
                        .map(|value| ThroughputRecord::new(key, value))
                }),
            )
        })
        .collect()
}

/// one `<workload>__<engine>.csv` per group with the mean makespan of every configuration
pub fn write_makespan(
    dir: &Path,
    aggregator: &SummaryAggregator,
) -> Result<Vec<PathBuf>, WriteError> {
    by_output_key(aggregator)
        .into_iter()
        .map(|(output_key, rows)| {
            write_group(
                dir,
                &output_key.to_string(),
                rows.into_iter().filter_map(|(key, stats)| {
                    stats
                        .makespan_s
                        .value()
                        .map(|value| MakespanRecord::new(key, value))
                }),
            )
        })
        .collect()
}

/// One `<workload>__<engine>__<workers>.csv` per chart.
/// Configurations follow each other in key order, each in time order.
pub fn write_timeline(
    dir: &Path,
    aggregator: &TimelineAggregator,
) -> Result<Vec<PathBuf>, WriteError> {
    let mut charts: BTreeMap<ChartKey, Vec<TimelineRecord>> = BTreeMap::new();

    for (key, series) in aggregator.iter() {
        let line_label = key.line_label();
        let rows = charts.entry(key.chart_key()).or_default();

        rows.extend(series.iter().map(|(bucket, stats)| TimelineRecord {
            elapsed_s: bucket.seconds(),
            mean: stats.mean(),
            min: stats.min(),
            max: stats.max(),
            tracking_prob: stats.tracking_prob(),
            repartitioning_prob: stats.repartitioning_prob(),
            storage_type: &key.storage_type,
            partitions: key.partitions,
            paths: key.paths,
            interval: key.interval,
            line_label: line_label.clone(),
        }));
    }

    charts
        .into_iter()
        .filter(|(_, rows)| !rows.is_empty())
        .map(|(chart_key, rows)| write_group(dir, &chart_key.to_string(), rows))
        .collect()
}
