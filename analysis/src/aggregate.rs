use crate::{
    extract::{
        summary::RunSummary,
        timeline::{TimeBucket, TimelineSample},
    },
    run_id::ConfigKey,
};
use std::collections::{btree_map::Entry, BTreeMap};

/// Running arithmetic mean
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// `None` until the first value was added
    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Totals of all repetitions of one configuration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryStats {
    pub ops_per_second: Mean,
    pub makespan_s: Mean,
}

impl SummaryStats {
    pub fn add(&mut self, run: &RunSummary) {
        self.ops_per_second.add(run.ops_per_second());
        self.makespan_s.add(run.makespan_s());
    }
}

/// Per configuration means of ops/second and makespan over all repetitions
#[derive(Debug, Default)]
pub struct SummaryAggregator {
    configs: BTreeMap<ConfigKey, SummaryStats>,
}

impl SummaryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &ConfigKey, run: &RunSummary) {
        self.configs.entry(key.clone()).or_default().add(run);
    }

    pub fn get(&self, key: &ConfigKey) -> Option<&SummaryStats> {
        self.configs.get(key)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// all configurations in key order
    pub fn iter(&self) -> impl Iterator<Item = (&ConfigKey, &SummaryStats)> {
        self.configs.iter()
    }
}

/// Throughput statistics of all samples that fell into the same time bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
    tracking: usize,
    repartitioning: usize,
}

impl BucketStats {
    fn new(sample: &TimelineSample) -> Self {
        Self {
            count: 1,
            sum: sample.throughput,
            min: sample.throughput,
            max: sample.throughput,
            tracking: usize::from(sample.tracking),
            repartitioning: usize::from(sample.repartitioning),
        }
    }

    fn add(&mut self, sample: &TimelineSample) {
        self.count += 1;
        self.sum += sample.throughput;
        self.min = self.min.min(sample.throughput);
        self.max = self.max.max(sample.throughput);
        self.tracking += usize::from(sample.tracking);
        self.repartitioning += usize::from(sample.repartitioning);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// share of samples with tracking active
    pub fn tracking_prob(&self) -> f64 {
        self.tracking as f64 / self.count as f64
    }

    /// share of samples with repartitioning active
    pub fn repartitioning_prob(&self) -> f64 {
        self.repartitioning as f64 / self.count as f64
    }
}

pub type Series = BTreeMap<TimeBucket, BucketStats>;

/// Per configuration throughput over time, merged over all repetitions
///
/// A repetition without a sample in a bucket simply does not contribute to it.
#[derive(Debug, Default)]
pub struct TimelineAggregator {
    configs: BTreeMap<ConfigKey, Series>,
}

impl TimelineAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// merge the samples of one repetition, an empty run leaves no trace
    pub fn add(&mut self, key: &ConfigKey, samples: &[TimelineSample]) {
        if samples.is_empty() {
            return;
        }

        let series = self.configs.entry(key.clone()).or_default();

        for sample in samples {
            match series.entry(sample.bucket) {
                Entry::Occupied(mut entry) => entry.get_mut().add(sample),
                Entry::Vacant(entry) => {
                    entry.insert(BucketStats::new(sample));
                }
            }
        }
    }

    pub fn get(&self, key: &ConfigKey) -> Option<&Series> {
        self.configs.get(key)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// all configurations in key order, each series in time order
    pub fn iter(&self) -> impl Iterator<Item = (&ConfigKey, &Series)> {
        self.configs.iter()
    }
}
