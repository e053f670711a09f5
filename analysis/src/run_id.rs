use std::{fmt, str::FromStr};
use thiserror::Error;

/// Separator between the configuration fields of a result file name
pub const FIELD_SEPARATOR: &str = "__";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("File name has no trailing repetition suffix such as `(1)`")]
    MissingRepetition,
    #[error("Expected 7 `__` separated fields, found {0}")]
    FieldCount(usize),
    #[error("Field `{field}` is not an integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// The experiment configuration of a run, i.e., everything but the repetition.
///
/// Field order matters: the derived ordering sorts by workload, then workers, storage type and
/// partitions, which is the row order of the summary outputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey {
    pub workload: String,
    pub workers: u32,
    pub storage_type: String,
    pub partitions: u32,
    pub storage_engine: String,
    pub paths: u32,
    pub interval: u32,
}

/// Workload and engine, one summary output file each
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputKey {
    pub workload: String,
    pub storage_engine: String,
}

/// Workload, engine and workers, one timeline chart each
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartKey {
    pub workload: String,
    pub storage_engine: String,
    pub workers: u32,
}

/// A single result file: configuration plus repetition index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId {
    pub config: ConfigKey,
    pub repetition: u32,
}

impl ConfigKey {
    pub fn output_key(&self) -> OutputKey {
        OutputKey {
            workload: self.workload.clone(),
            storage_engine: self.storage_engine.clone(),
        }
    }

    pub fn chart_key(&self) -> ChartKey {
        ChartKey {
            workload: self.workload.clone(),
            storage_engine: self.storage_engine.clone(),
            workers: self.workers,
        }
    }

    /// label of a series inside a chart, made from the fields that vary within it
    pub fn line_label(&self) -> String {
        format!(
            "{}_p{}_w{}_i{}",
            self.storage_type, self.partitions, self.paths, self.interval
        )
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<u32, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidNumber {
        field,
        value: value.to_owned(),
    })
}

/// Configuration fields must be written canonically, `01` and `1` would otherwise name the same
/// configuration through two different file names
fn parse_field(field: &'static str, value: &str) -> Result<u32, DecodeError> {
    let number = parse_number(field, value)?;

    if number.to_string() != value {
        return Err(DecodeError::InvalidNumber {
            field,
            value: value.to_owned(),
        });
    }

    Ok(number)
}

/// split `name(rep)` into `name` and `rep`
fn split_repetition(stem: &str) -> Result<(&str, u32), DecodeError> {
    let (name, suffix) = stem
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once('('))
        .ok_or(DecodeError::MissingRepetition)?;

    if suffix.is_empty() || !suffix.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(DecodeError::MissingRepetition);
    }

    Ok((name, parse_number("repetition", suffix)?))
}

impl FromStr for ConfigKey {
    type Err = DecodeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = name.split(FIELD_SEPARATOR).collect();

        let [workload, workers, storage_type, partitions, storage_engine, paths, interval] =
            fields[..]
        else {
            return Err(DecodeError::FieldCount(fields.len()));
        };

        Ok(Self {
            workload: workload.to_owned(),
            workers: parse_field("workers", workers)?,
            storage_type: storage_type.to_owned(),
            partitions: parse_field("partitions", partitions)?,
            storage_engine: storage_engine.to_owned(),
            paths: parse_field("paths", paths)?,
            interval: parse_field("interval", interval)?,
        })
    }
}

impl FromStr for RunId {
    type Err = DecodeError;

    /// Decode a result file name such as `ycsb_a__1__engine__1__tkrzw_tree__1__0(1).csv`.
    /// The extension is optional.
    fn from_str(file_name: &str) -> Result<Self, Self::Err> {
        let stem = file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _extension)| stem);
        let (name, repetition) = split_repetition(stem)?;

        Ok(Self {
            config: name.parse()?,
            repetition,
        })
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.workload,
            self.workers,
            self.storage_type,
            self.partitions,
            self.storage_engine,
            self.paths,
            self.interval,
            sep = FIELD_SEPARATOR
        )
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.config, self.repetition)
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{FIELD_SEPARATOR}{}", self.workload, self.storage_engine)
    }
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.workload,
            self.storage_engine,
            self.workers,
            sep = FIELD_SEPARATOR
        )
    }
}
