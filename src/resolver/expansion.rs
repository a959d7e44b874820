//! Directory entry expansion
//!
//! This module turns an entry naming a sample directory into one entry per sample file
//! directly inside it.

use std::io;
use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use log::{debug, trace};

use crate::config::ConfigEntry;
use crate::constants::SAMPLE_EXTENSION;
use crate::errors::{
    Error, Result, directory_not_found_error, file_operation_error, glob_pattern_error,
    invalid_filename_error,
};
use crate::utils::file_name_str;

/// Expands a directory entry against the resource root
///
/// Only files directly inside the directory are picked up, minus the files named in the
/// entry's exclusions. Every produced entry keeps the override, exclusions and transform
/// of the directory entry.
///
/// # Errors
/// Returns an error if the directory does not exist or cannot be scanned
pub fn expand_directory(resource_root: &Path, entry: &ConfigEntry) -> Result<Vec<ConfigEntry>> {
    let directory = resource_root.join(&entry.sample_location);
    if !directory.is_dir() {
        return Err(directory_not_found_error(directory));
    }

    let directory_str = directory
        .to_str()
        .ok_or_else(|| invalid_filename_error(directory.clone()))?;
    let pattern_path =
        PathBuf::from(Pattern::escape(directory_str)).join(format!("*.{SAMPLE_EXTENSION}"));
    let pattern = pattern_path
        .to_str()
        .ok_or_else(|| invalid_filename_error(pattern_path.clone()))?;

    let paths = glob(pattern)
        .map_err(|e| glob_pattern_error(e, pattern))?
        .map(|res| {
            res.map_err(|e| {
                let path = e.path().to_path_buf();
                file_operation_error(io::Error::from(e), path, "scan")
            })
        })
        .collect::<std::result::Result<Vec<PathBuf>, Error>>()?;

    let mut entries = Vec::new();
    for path in paths {
        if !path.is_file() {
            trace!("Skipping {}", path.display());
            continue;
        }

        let file_name = file_name_str(&path)?;
        if entry.exclude_file_names.contains(file_name) {
            debug!("Excluding {}", path.display());
            continue;
        }

        entries.push(entry.with_sample_location(format!("{}{}", entry.sample_location, file_name)));
    }

    debug!(
        "Expanded {} into {} samples",
        entry.sample_location,
        entries.len()
    );
    Ok(entries)
}
