use super::run_id::{ConfigKey, DecodeError, RunId};

fn config(workload: &str, workers: u32, storage_type: &str, engine: &str) -> ConfigKey {
    ConfigKey {
        workload: workload.to_owned(),
        workers,
        storage_type: storage_type.to_owned(),
        partitions: 4,
        storage_engine: engine.to_owned(),
        paths: 2,
        interval: 500,
    }
}

#[test]
pub fn decode_result_file_name() {
    let run: RunId = "ycsb_a__1__engine__1__tkrzw_tree__1__0(1).csv".parse().unwrap();

    assert_eq!(run.repetition, 1);
    assert_eq!(run.config.workload, "ycsb_a");
    assert_eq!(run.config.workers, 1);
    assert_eq!(run.config.storage_type, "engine");
    assert_eq!(run.config.partitions, 1);
    assert_eq!(run.config.storage_engine, "tkrzw_tree");
    assert_eq!(run.config.paths, 1);
    assert_eq!(run.config.interval, 0);
    assert_eq!(run.config.to_string(), "ycsb_a__1__engine__1__tkrzw_tree__1__0");
}

#[test]
pub fn encode_then_decode_recovers_fields() {
    let runs = [
        RunId {
            config: config("ycsb_a", 8, "hash", "tkrzw_tree"),
            repetition: 3,
        },
        RunId {
            config: config("ycsb-c", 64, "engine", "lmdb"),
            repetition: 12,
        },
        RunId {
            config: config("tpcc", 1, "kv", "rocks_db"),
            repetition: 0,
        },
    ];

    for run in runs {
        let encoded = run.to_string();

        assert_eq!(encoded.parse::<RunId>().unwrap(), run);
        assert_eq!(format!("{encoded}.csv").parse::<RunId>().unwrap(), run);
    }
}

#[test]
pub fn missing_repetition_is_rejected() {
    for name in [
        "ycsb_a__1__engine__1__tkrzw_tree__1__0.csv",
        "ycsb_a__1__engine__1__tkrzw_tree__1__0().csv",
        "ycsb_a__1__engine__1__tkrzw_tree__1__0(x).csv",
        "ycsb_a__1__engine__1__tkrzw_tree__1__0(1)b.csv",
    ] {
        assert_eq!(
            name.parse::<RunId>(),
            Err(DecodeError::MissingRepetition),
            "{name}"
        );
    }
}

#[test]
pub fn wrong_field_count_is_rejected() {
    assert_eq!(
        "ycsb_a__1__engine__1__tkrzw_tree__1(1).csv".parse::<RunId>(),
        Err(DecodeError::FieldCount(6))
    );
    assert_eq!(
        "ycsb_a__1__engine__1__tkrzw_tree__1__0__9(2).csv".parse::<RunId>(),
        Err(DecodeError::FieldCount(8))
    );
}

#[test]
pub fn non_numeric_field_is_rejected() {
    assert_eq!(
        "ycsb_a__many__engine__1__tkrzw_tree__1__0(1).csv".parse::<RunId>(),
        Err(DecodeError::InvalidNumber {
            field: "workers",
            value: "many".to_owned()
        })
    );
}

#[test]
pub fn derived_keys() {
    let key = config("ycsb_a", 8, "hash", "tkrzw_tree");

    assert_eq!(key.output_key().to_string(), "ycsb_a__tkrzw_tree");
    assert_eq!(key.chart_key().to_string(), "ycsb_a__tkrzw_tree__8");
    assert_eq!(key.line_label(), "hash_p4_w2_i500");
}

#[test]
pub fn repetition_is_not_part_of_the_key() {
    let first: RunId = "ycsb_a__1__engine__1__tkrzw_tree__1__0(1).csv".parse().unwrap();
    let second: RunId = "ycsb_a__1__engine__1__tkrzw_tree__1__0(2).csv".parse().unwrap();

    assert_ne!(first, second);
    assert_eq!(first.config, second.config);
}

#[test]
pub fn padded_numbers_are_rejected() {
    for (name, field, value) in [
        ("ycsb_a__01__engine__1__tkrzw_tree__1__0(1).csv", "workers", "01"),
        ("ycsb_a__1__engine__+4__tkrzw_tree__1__0(1).csv", "partitions", "+4"),
        ("ycsb_a__1__engine__1__tkrzw_tree__1__00(1).csv", "interval", "00"),
    ] {
        assert_eq!(
            name.parse::<RunId>(),
            Err(DecodeError::InvalidNumber {
                field,
                value: value.to_owned()
            }),
            "{name}"
        );
    }

    // the repetition is not part of the configuration, padding is harmless there
    let run: RunId = "ycsb_a__1__engine__1__tkrzw_tree__1__0(01).csv".parse().unwrap();
    assert_eq!(run.repetition, 1);
    assert_eq!(run.to_string(), "ycsb_a__1__engine__1__tkrzw_tree__1__0(1)");
}
