use crate::pipeline::Variant;
use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::{fs, io::Error, path::Path, path::PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Glob was invalid")]
    InvalidGlob(#[from] globset::Error),
    #[error("Config file could not be read")]
    FileNotReadable(#[from] Error),
    #[error("Config file is not valid yaml or contains unknown fields")]
    InvalidConfig(#[from] serde_yaml::Error),
    #[error("Input directory {0:?} not found")]
    InputNotFound(PathBuf),
}

/// Content of the optional yaml config file, every field can be overridden from the command line
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    // directory containing the per run result files
    #[serde(default)]
    pub input_dir: Option<PathBuf>,
    // directory for the aggregated files, the default depends on the variant
    #[serde(default, alias = "output")]
    pub output_dir: Option<PathBuf>,
    // glob matched against the file name of every candidate
    #[serde(default = "default_pattern")]
    pub pattern: String,
    // abort on the first malformed file instead of skipping it
    #[serde(default)]
    pub strict: bool,
}

/// Fully resolved parameters of a single pipeline run
#[derive(Clone, Debug)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub matcher: GlobMatcher,
    pub strict: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            pattern: default_pattern(),
            strict: false,
        }
    }
}

impl AnalysisConfig {
    /// load a config from a yaml file
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        let content = fs::read_to_string(path)?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigErrors> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Compile the glob and fill in the defaults of `variant`
    pub fn settings(&self, variant: Variant) -> Result<Settings, ConfigErrors> {
        let input_dir = self
            .input_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(variant.default_output_dir()));

        if !input_dir.is_dir() {
            return Err(ConfigErrors::InputNotFound(input_dir));
        }

        if output_dir == input_dir {
            warn!("Output directory equals the input directory, later runs may pick up outputs");
        }

        let matcher = GlobBuilder::new(&self.pattern)
            .literal_separator(true)
            .build()?
            .compile_matcher();

        debug!("Filtering with glob: {matcher:?}");

        Ok(Settings {
            input_dir,
            output_dir,
            matcher,
            strict: self.strict,
        })
    }
}

fn default_pattern() -> String {
    String::from("*(*).csv")
}
