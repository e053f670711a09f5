use crate::config::{ConfigErrors, Settings};
use ignore::{DirEntry, WalkBuilder};
use itertools::Itertools;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Result files of a single input directory, in file name order
#[derive(Debug)]
pub struct Collector {
    paths: std::vec::IntoIter<PathBuf>,
}

fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().map_or(false, |file_type| file_type.is_file())
}

impl Collector {
    /// list all files directly inside `settings.input_dir` that match the glob
    pub fn load(settings: &Settings) -> Result<Self, ConfigErrors> {
        if !settings.input_dir.is_dir() {
            return Err(ConfigErrors::InputNotFound(settings.input_dir.clone()));
        }

        // plain listing, result directories are frequently hidden or ignored by git
        let mut builder = WalkBuilder::new(&settings.input_dir);
        builder
            .standard_filters(false)
            .follow_links(true)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b));

        let paths = builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    warn!("Failed to list result file: {error}");
                    None
                }
            })
            .filter(|entry| entry.depth() == 1 && is_file(entry))
            .filter(|entry| settings.matcher.is_match(entry.file_name()))
            .map(DirEntry::into_path)
            .collect_vec();

        debug!(
            input_dir = ?settings.input_dir,
            "Collected {} result files",
            paths.len()
        );

        Ok(Self {
            paths: paths.into_iter(),
        })
    }
}

impl Iterator for Collector {
    type Item = PathBuf;

    /// return accurate size for underlying iterator
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }

    fn next(&mut self) -> Option<Self::Item> {
        self.paths.next()
    }
}
