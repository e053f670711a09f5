pub mod summary;
pub mod timeline;


use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read result file")]
    Io(#[from] std::io::Error),
    #[error("Failed to read csv record")]
    Csv(#[from] csv::Error),
    #[error("Result file has too few lines")]
    TooFewLines,
    #[error("Last line has fewer than 2 comma separated fields")]
    TooFewFields,
    #[error("Column `{0}` is missing from the header")]
    MissingColumn(&'static str),
    #[error("Record {record} has no value for `{column}`")]
    MissingValue { column: &'static str, record: usize },
    #[error("Field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Elapsed time must be positive, got {0} ms")]
    NonPositiveElapsed(f64),
}

/// Parse a number that uses `.` as thousands separator, e.g., `12.345` is twelve thousand.
///
/// NOTE: genuine decimals are not supported, `1.5` parses as `15`
pub fn parse_grouped(field: &'static str, value: &str) -> Result<f64, ExtractError> {
    let digits: String = value.chars().filter(|c| *c != '.').collect();

    digits
        .trim()
        .parse()
        .map_err(|_| ExtractError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
}
