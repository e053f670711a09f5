use crate::{
    aggregate::{Mean, SummaryAggregator, TimelineAggregator},
    extract::{
        summary::RunSummary,
        timeline::{TimeBucket, TimelineSample},
    },
    run_id::ConfigKey,
};

fn key(workers: u32) -> ConfigKey {
    "ycsb_a__1__engine__1__tkrzw_tree__1__0"
        .replace("ycsb_a__1", &format!("ycsb_a__{workers}"))
        .parse()
        .unwrap()
}

fn run(ops_per_second: f64) -> RunSummary {
    RunSummary {
        elapsed_ms: 2000.0,
        executed: ops_per_second * 2.0,
    }
}

fn sample(tenths: i64, throughput: f64, tracking: bool) -> TimelineSample {
    TimelineSample {
        bucket: TimeBucket(tenths),
        throughput,
        tracking,
        repartitioning: false,
    }
}

#[test]
pub fn empty_mean_has_no_value() {
    let mut mean = Mean::default();
    assert_eq!(mean.value(), None);

    mean.add(3.0);
    mean.add(5.0);
    assert_eq!(mean.value(), Some(4.0));
    assert_eq!(mean.count(), 2);
}

#[test]
pub fn repetitions_are_averaged() {
    let mut aggregator = SummaryAggregator::new();
    aggregator.add(&key(1), &run(100.0));
    aggregator.add(&key(1), &run(200.0));
    aggregator.add(&key(2), &run(400.0));

    assert_eq!(aggregator.len(), 2);

    let stats = aggregator.get(&key(1)).unwrap();
    assert_eq!(stats.ops_per_second.value(), Some(150.0));
    assert_eq!(stats.makespan_s.value(), Some(2.0));
    assert_eq!(stats.ops_per_second.count(), 2);

    let stats = aggregator.get(&key(2)).unwrap();
    assert_eq!(stats.ops_per_second.value(), Some(400.0));
}

#[test]
pub fn configurations_iterate_in_key_order() {
    let mut aggregator = SummaryAggregator::new();
    aggregator.add(&key(8), &run(1.0));
    aggregator.add(&key(2), &run(1.0));
    aggregator.add(&key(4), &run(1.0));

    let workers: Vec<u32> = aggregator.iter().map(|(key, _)| key.workers).collect();
    assert_eq!(workers, vec![2, 4, 8]);
}

#[test]
pub fn bucket_statistics_over_repetitions() {
    let mut aggregator = TimelineAggregator::new();
    aggregator.add(&key(1), &[sample(10, 100.0, true), sample(20, 50.0, false)]);
    aggregator.add(&key(1), &[sample(10, 300.0, true)]);
    aggregator.add(&key(1), &[sample(10, 200.0, false)]);
    aggregator.add(&key(1), &[sample(10, 400.0, false)]);

    let series = aggregator.get(&key(1)).unwrap();
    let first = &series[&TimeBucket(10)];

    assert_eq!(first.count(), 4);
    assert_eq!(first.mean(), 250.0);
    assert_eq!(first.min(), 100.0);
    assert_eq!(first.max(), 400.0);
    assert_eq!(first.tracking_prob(), 0.5);
    assert_eq!(first.repartitioning_prob(), 0.0);

    // only the first repetition reached two seconds
    let second = &series[&TimeBucket(20)];
    assert_eq!(second.count(), 1);
    assert_eq!(second.mean(), 50.0);
    assert_eq!(second.tracking_prob(), 0.0);

    let buckets: Vec<_> = series.keys().copied().collect();
    assert_eq!(buckets, vec![TimeBucket(10), TimeBucket(20)]);
}

#[test]
pub fn runs_without_samples_are_ignored() {
    let mut aggregator = TimelineAggregator::new();
    aggregator.add(&key(1), &[]);

    assert!(aggregator.is_empty());
    assert!(aggregator.get(&key(1)).is_none());
}
