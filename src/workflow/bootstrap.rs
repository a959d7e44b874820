//! Sample bootstrap
//!
//! This module copies raw sample files from a contribution source tree into the
//! resource root and seeds blank expectation files next to them.

use std::collections::BTreeSet;
use std::fs::{create_dir_all, read_dir, read_to_string, write};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::Serialize;
use walkdir::WalkDir;

use crate::constants::EXPECTATIONS_FILE_NAME;
use crate::errors::{directory_not_found_error, file_operation_error, path_operation_error};
use crate::utils::{file_name_str, normalise_line_endings, sanitize_path, to_slash_string};

use super::context::WorkflowContext;
use super::engine::{ConfigOptions, prepare_config};

/// Options for the bootstrap step
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub config: ConfigOptions,
    /// Directory the configured copy sources are relative to
    pub source_base: PathBuf,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QualificationExpectation {
    success: bool,
    qualify_results: Vec<String>,
    qualifiable_object_count: u32,
}

/// Blank expectation for one sample
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ExpectationRecord<'a> {
    file_name: &'a str,
    excluded_paths: u32,
    external_paths: u32,
    outstanding_mappings: u32,
    validation_failures: u32,
    qualification_expectation: QualificationExpectation,
}

impl<'a> ExpectationRecord<'a> {
    fn blank(file_name: &'a str) -> Self {
        ExpectationRecord {
            file_name,
            excluded_paths: 0,
            external_paths: 0,
            outstanding_mappings: 0,
            validation_failures: 0,
            qualification_expectation: QualificationExpectation {
                success: true,
                qualify_results: Vec::new(),
                qualifiable_object_count: 0,
            },
        }
    }
}

/// Every file below `directory`, at any depth, whose name ends in `.<extension>`
///
/// Symbolic links are followed. A link that loops back to one of its ancestors is an error.
fn files_with_extension(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{extension}");
    let mut files = Vec::new();

    for entry in WalkDir::new(directory).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map_or_else(|| directory.to_path_buf(), Path::to_path_buf);
            file_operation_error(io::Error::from(e), path, "walk")
        })?;
        if entry.file_type().is_file() && file_name_str(entry.path())?.ends_with(&suffix) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(unix)]
fn set_sample_permissions(path: &Path) -> Result<()> {
    use std::fs::{Permissions, set_permissions};
    use std::os::unix::fs::PermissionsExt;

    set_permissions(path, Permissions::from_mode(0o644))
        .map_err(|e| file_operation_error(e, path.to_path_buf(), "set permissions"))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_sample_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Copies every file with the given extension below `source` into `target`
///
/// The path below `target` is sanitised and line endings are normalised to `\n`.
///
/// # Returns
/// * `Result<usize>` - The number of files copied
pub fn copy_source_files(source: &Path, target: &Path, extension: &str) -> Result<usize> {
    if !source.is_dir() {
        return Err(directory_not_found_error(source.to_path_buf()).into());
    }

    let files = files_with_extension(source, extension)?;
    for source_file in &files {
        let relative = source_file
            .strip_prefix(source)
            .map_err(|_| path_operation_error(source_file.clone(), "relativize"))?;
        let target_file = target.join(sanitize_path(relative)?);
        info!("Copying {}", source_file.display());

        if let Some(parent) = target_file.parent() {
            create_dir_all(parent)
                .map_err(|e| file_operation_error(e, parent.to_path_buf(), "create directory"))?;
        }

        let contents = read_to_string(source_file)
            .map_err(|e| file_operation_error(e, source_file.clone(), "read"))?;
        write(&target_file, normalise_line_endings(&contents))
            .map_err(|e| file_operation_error(e, target_file.clone(), "write"))?;
        set_sample_permissions(&target_file)?;
    }

    Ok(files.len())
}

/// Renders the blank expectations for the entries of one sample directory
fn expectations_for(resource_root: &Path, directory: &Path) -> Result<String> {
    let mut names = Vec::new();
    for entry in read_dir(directory)
        .map_err(|e| file_operation_error(e, directory.to_path_buf(), "list"))?
    {
        let path = entry
            .map_err(|e| file_operation_error(e, directory.to_path_buf(), "list"))?
            .path();
        let relative = path
            .strip_prefix(resource_root)
            .map_err(|_| path_operation_error(path.clone(), "relativize"))?;
        let name = to_slash_string(relative)?;
        if !name.contains(EXPECTATIONS_FILE_NAME) {
            names.push(name);
        }
    }
    names.sort();

    let records = names
        .iter()
        .map(|name| serde_json::to_string(&ExpectationRecord::blank(name)))
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(format!("[\n{}]", records.join(",\n")))
}

/// Writes a blank `expectations.json` into every sample directory below a test pack
///
/// A sample directory is one that directly holds a file with the given extension. The
/// test pack directory itself is left alone. Existing files are only replaced when
/// `overwrite` is set.
///
/// # Returns
/// * `Result<usize>` - The number of expectation files written
pub fn create_blank_expectations(
    resource_root: &Path,
    test_pack: &Path,
    extension: &str,
    overwrite: bool,
) -> Result<usize> {
    let test_pack_dir = resource_root.join(test_pack);
    if !test_pack_dir.is_dir() {
        return Err(directory_not_found_error(test_pack_dir).into());
    }

    let directories: BTreeSet<PathBuf> = files_with_extension(&test_pack_dir, extension)?
        .iter()
        .filter_map(|file| file.parent().map(Path::to_path_buf))
        .filter(|directory| directory != &test_pack_dir)
        .collect();

    let mut written = 0;
    for directory in directories {
        let expectations_file = directory.join(EXPECTATIONS_FILE_NAME);
        if expectations_file.exists() && !overwrite {
            debug!("Keeping {}", expectations_file.display());
            continue;
        }

        let contents = expectations_for(resource_root, &directory)?;
        info!("Writing {}", expectations_file.display());
        write(&expectations_file, contents)
            .map_err(|e| file_operation_error(e, expectations_file.clone(), "write"))?;
        written += 1;
    }

    Ok(written)
}

/// Runs the configured bootstrap copies followed by the expectation initialisation
///
/// # Errors
/// Returns an error if the configuration has no bootstrap section or any copy fails
pub fn bootstrap_samples(options: BootstrapOptions) -> Result<WorkflowContext> {
    let config = prepare_config(&options.config)?;
    let bootstrap = config
        .bootstrap
        .clone()
        .ok_or_else(|| anyhow!("No bootstrap section in configuration"))?;

    if !options.source_base.is_dir() {
        return Err(directory_not_found_error(options.source_base).into());
    }

    let resource_root = config.resource_root();
    let mut context = WorkflowContext::new();

    for copy in &bootstrap.copies {
        let source = options.source_base.join(&copy.from);
        let target = resource_root.join(&copy.to);
        let copied = copy_source_files(&source, &target, &bootstrap.extension)
            .with_context(|| format!("Failed to bootstrap {}", copy.from.display()))?;
        context.stats.samples_bootstrapped += copied;
    }

    if let Some(expectations) = &bootstrap.expectations {
        context.stats.expectations_written = create_blank_expectations(
            &resource_root,
            &expectations.test_pack,
            &bootstrap.extension,
            expectations.overwrite,
        )?;
    }

    info!(
        "Bootstrapped {} samples and {} expectation files",
        context.stats.samples_bootstrapped, context.stats.expectations_written
    );
    Ok(context)
}
