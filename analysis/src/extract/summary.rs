use super::{parse_grouped, ExtractError};
use std::{fs, path::Path};

/// Totals of a single run, taken from the last sample of its result file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub elapsed_ms: f64,
    pub executed: f64,
}

impl RunSummary {
    pub fn ops_per_second(&self) -> f64 {
        self.executed / self.makespan_s()
    }

    pub fn makespan_s(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}

/// read the totals of a run from an unlabeled `elapsed_ms,executed_count,...` file
pub fn extract(path: &Path) -> Result<RunSummary, ExtractError> {
    parse(&fs::read_to_string(path)?)
}

pub fn parse(content: &str) -> Result<RunSummary, ExtractError> {
    let lines: Vec<&str> = content.lines().collect();

    let last_line = match lines[..] {
        [] | [_] => return Err(ExtractError::TooFewLines),
        [.., second_last, last] => match last.trim() {
            // blank last line, fall back to the one before it
            "" if lines.len() < 3 => return Err(ExtractError::TooFewLines),
            "" => second_last.trim(),
            last => last,
        },
    };

    let fields: Vec<&str> = last_line.split(',').collect();
    let [elapsed, executed, ..] = fields[..] else {
        return Err(ExtractError::TooFewFields);
    };

    let elapsed_ms = parse_grouped("elapsed_ms", elapsed)?;
    let executed = parse_grouped("executed_count", executed)?;

    if elapsed_ms.is_nan() || elapsed_ms <= 0.0 {
        return Err(ExtractError::NonPositiveElapsed(elapsed_ms));
    }

    Ok(RunSummary {
        elapsed_ms,
        executed,
    })
}
