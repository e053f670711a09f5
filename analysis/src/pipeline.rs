use crate::{
    aggregate::{SummaryAggregator, TimelineAggregator},
    collector::Collector,
    config::{ConfigErrors, Settings},
    extract::{summary, timeline, ExtractError},
    run_id::{ConfigKey, DecodeError, RunId},
    writer::{self, WriteError},
};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Why a single result file was not used
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Unexpected file name: {0}")]
    Decode(#[from] DecodeError),
    #[error("Unusable file content: {0}")]
    Extract(#[from] ExtractError),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid configuration")]
    Config(#[from] ConfigErrors),
    #[error("Failed to write aggregated results")]
    Write(#[from] WriteError),
    #[error("Rejected {path:?} in strict mode")]
    Rejected { path: PathBuf, source: FileError },
}

/// The three flavours of the aggregation, they differ only in the emitted metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// mean ops/second per configuration
    Throughput,
    /// mean ops/second and mean makespan per configuration
    Metrics,
    /// throughput over time per chart
    Timeline,
}

impl Variant {
    pub fn default_output_dir(self) -> &'static str {
        match self {
            Self::Throughput | Self::Metrics => "aggregated_results",
            Self::Timeline => "aggregated_throughput_time",
        }
    }
}

/// Outcome of a pipeline run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// files matched by the collector
    pub collected: usize,
    /// files that contributed to at least one aggregate
    pub used: usize,
    /// malformed files that were skipped
    pub skipped: usize,
    /// distinct configurations with at least one usable file
    pub configurations: usize,
    pub written: Vec<PathBuf>,
}

/// result files grouped by configuration, repetitions in file name order
type RunMap = BTreeMap<ConfigKey, Vec<(u32, PathBuf)>>;

#[derive(Debug)]
pub struct Pipeline {
    settings: Settings,
    variant: Variant,
    report: Report,
}

impl Pipeline {
    pub fn new(settings: Settings, variant: Variant) -> Self {
        Self {
            settings,
            variant,
            report: Report::default(),
        }
    }

    /// scan, aggregate and write, consuming the pipeline
    #[instrument(skip(self), level = "info")]
    pub fn run(mut self) -> Result<Report, AnalysisError> {
        let runs = self.decode(Collector::load(&self.settings)?)?;
        let output_dir = self.settings.output_dir.clone();

        let written = match self.variant {
            Variant::Throughput => {
                let aggregator = self.summarize(&runs)?;
                writer::write_throughput(&output_dir, &aggregator)?
            }
            Variant::Metrics => {
                let aggregator = self.summarize(&runs)?;
                let mut written =
                    writer::write_throughput(&output_dir.join("throughput"), &aggregator)?;
                written.extend(writer::write_makespan(
                    &output_dir.join("makespan"),
                    &aggregator,
                )?);
                written
            }
            Variant::Timeline => {
                let aggregator = self.timeline(&runs)?;
                writer::write_timeline(&output_dir, &aggregator)?
            }
        };

        self.report.written = written;
        info!(
            collected = self.report.collected,
            used = self.report.used,
            skipped = self.report.skipped,
            "Done with processing, wrote {} files",
            self.report.written.len()
        );

        Ok(self.report)
    }

    /// Skip a malformed file, or abort in strict mode
    fn reject(&mut self, path: &Path, error: FileError) -> Result<(), AnalysisError> {
        if self.settings.strict {
            return Err(AnalysisError::Rejected {
                path: path.to_path_buf(),
                source: error,
            });
        }

        warn!(path = ?path, "Skipping file: {error}");
        self.report.skipped += 1;

        Ok(())
    }

    fn decode<I: Iterator<Item = PathBuf>>(&mut self, paths: I) -> Result<RunMap, AnalysisError> {
        let mut runs = RunMap::new();

        for path in paths {
            self.report.collected += 1;

            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            match file_name.parse::<RunId>() {
                Ok(run) => {
                    debug!(path = ?path, repetition = run.repetition, "Decoded {}", run.config);
                    runs.entry(run.config).or_default().push((run.repetition, path));
                }
                Err(error) => self.reject(&path, error.into())?,
            }
        }

        Ok(runs)
    }

    /// extract every file of every configuration, rejected files are left out
    fn extract_all<'r, T, F>(
        &mut self,
        runs: &'r RunMap,
        extract: F,
    ) -> Result<Vec<(&'r ConfigKey, T)>, AnalysisError>
    where
        F: Fn(&Path) -> Result<T, ExtractError>,
    {
        let mut extracted = Vec::new();

        for (key, files) in runs {
            if self.variant == Variant::Timeline {
                info!("Processing config: {key}");
            }

            for (repetition, path) in files {
                match extract(path.as_path()) {
                    Ok(value) => {
                        self.report.used += 1;
                        extracted.push((key, value));
                    }
                    Err(error) => {
                        debug!(repetition = *repetition, "Extraction failed for {key}");
                        self.reject(path, error.into())?;
                    }
                }
            }
        }

        Ok(extracted)
    }

    fn summarize(&mut self, runs: &RunMap) -> Result<SummaryAggregator, AnalysisError> {
        let mut aggregator = SummaryAggregator::new();

        for (key, run) in self.extract_all(runs, summary::extract)? {
            aggregator.add(key, &run);
        }

        self.report.configurations = aggregator.len();

        Ok(aggregator)
    }

    fn timeline(&mut self, runs: &RunMap) -> Result<TimelineAggregator, AnalysisError> {
        let mut aggregator = TimelineAggregator::new();

        for (key, samples) in self.extract_all(runs, timeline::extract)? {
            aggregator.add(key, &samples);
        }

        self.report.configurations = aggregator.len();

        Ok(aggregator)
    }
}
