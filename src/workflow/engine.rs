//! Workflow engine
//!
//! This module contains the engine that turns the resolved test pack table into
//! generated files.

use std::collections::{BTreeMap, HashSet};
use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info, warn};

use crate::config::{Config, ConfigEntry, locate_config, read_builtin_config, read_config};
use crate::errors::{file_operation_error, sample_not_found_error};
use crate::logging::format_message;
use crate::resolver::{Resolver, target_location, test_packs_of};
use crate::utils::{directory_name, file_name_str};

use super::context::{OperationType, PlannedOperation, WorkflowContext};

/// Where to read the test pack table from, and which of its directories to override
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Replaces the configured resource root
    pub resource_root: Option<PathBuf>,
    /// Replaces the configured output directory
    pub output: Option<PathBuf>,
}

/// Options for generating test packs
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub config: ConfigOptions,
    /// Whether to only plan the writes (true) or perform them (false)
    pub dry_run: bool,
}

/// Reads the configuration, applies the command-line overrides and validates the result
///
/// The built-in table is used when no configuration file can be found.
pub fn prepare_config(options: &ConfigOptions) -> Result<Config> {
    let mut config = match locate_config(options.config_path.clone())? {
        Some(file) => read_config(&file)?,
        None => read_builtin_config()?,
    };

    if let Some(resource_root) = &options.resource_root {
        config.resource_root = Some(resource_root.clone());
    }
    if let Some(output) = &options.output {
        config.output = Some(output.clone());
    }

    config.validate(true)?;
    Ok(config)
}

/// Builds the resolver for a validated configuration
pub fn resolver_for(config: &Config) -> Result<Resolver> {
    Ok(Resolver::new(config.resource_root(), config.entries()?))
}

/// Path a resolved entry is written to below the output directory
///
/// # Errors
/// Returns an error if the target location has no file name
pub fn output_path(output: &Path, entry: &ConfigEntry) -> Result<PathBuf> {
    let target = PathBuf::from(target_location(entry));
    let file_name = file_name_str(&target)?;
    Ok(output
        .join(directory_name(&entry.test_pack.name))
        .join(file_name))
}

/// Generates every test pack in the configuration
///
/// This function orchestrates the workflow steps:
/// 1. Read the configuration
/// 2. Resolve the configured entries into sample files
/// 3. Read each sample and apply its transform
/// 4. Write the result below the output directory
///
/// # Errors
/// Returns an error naming the failing entry as soon as any step fails
pub fn generate_test_packs(options: GenerateOptions) -> Result<WorkflowContext> {
    // Step 1: Read the configuration
    let config = prepare_config(&options.config)?;
    let mut context = WorkflowContext::new();

    // Step 2: Resolve the entries
    let resolver = resolver_for(&config)?;
    let resolved = resolver.resolve_all()?;
    context.stats.entries_resolved = resolved.len();

    if resolved.is_empty() {
        info!("No samples found below {}", config.resource_root().display());
        return Ok(context);
    }

    let output = config.output();
    info!(
        "Generating {} samples into {}{}...",
        resolved.len(),
        output.display(),
        if options.dry_run { " (dry run)" } else { "" }
    );

    let mut targets = HashSet::new();
    for entry in &resolved {
        let source = resolver.resource_root().join(&entry.sample_location);
        let destination = output_path(&output, entry)?;

        if !targets.insert(destination.clone()) {
            warn!(
                "{} is generated by more than one entry, keeping the output of {}",
                destination.display(),
                entry.sample_location
            );
        }

        if entry.transform.is_copy() {
            context.increment_files_copied();
        } else {
            context.increment_files_transformed();
        }

        if options.dry_run {
            context.add_planned_operation(PlannedOperation {
                source,
                destination,
                operation_type: if entry.transform.is_copy() {
                    OperationType::Copy
                } else {
                    OperationType::Transform(entry.transform.label())
                },
                test_pack: entry.test_pack.name.clone(),
            });
            continue;
        }

        // Steps 3 and 4: Transform and write the sample
        generate_entry(entry, &source, &destination).with_context(|| {
            format!(
                "Failed to generate {} for test pack '{}'",
                entry.sample_location, entry.test_pack.name
            )
        })?;
        context.increment_files_written();

        let message = format!("{} -> {}", entry.sample_location, destination.display());
        let colored_message = format!(
            "{} -> {}",
            entry.sample_location,
            destination.display().to_string().green()
        );
        info!("{}", format_message(&message, &colored_message));
    }

    if options.dry_run {
        info!(
            "Planned {} test packs, nothing was written",
            test_packs_of(&resolved).len()
        );
        if !context.planned_operations.is_empty() {
            print_plan(&context);
        }
    } else {
        info!(
            "Finished generating {} test packs",
            test_packs_of(&resolved).len()
        );
    }

    Ok(context)
}

fn generate_entry(entry: &ConfigEntry, source: &Path, destination: &Path) -> Result<()> {
    debug!(
        "Generating {} from {}",
        destination.display(),
        source.display()
    );

    if !source.is_file() {
        return Err(sample_not_found_error(source.to_path_buf()).into());
    }

    let input = read_to_string(source)
        .map_err(|e| file_operation_error(e, source.to_path_buf(), "read"))?;
    let generated = entry.transform.apply(&input)?;

    if let Some(parent) = destination.parent() {
        create_dir_all(parent)
            .map_err(|e| file_operation_error(e, parent.to_path_buf(), "create directory"))?;
    }
    write(destination, generated)
        .map_err(|e| file_operation_error(e, destination.to_path_buf(), "write"))?;

    Ok(())
}

fn print_plan(context: &WorkflowContext) {
    println!("\nDetailed plan of operations:");
    println!("===========================");

    let mut by_test_pack: BTreeMap<&str, Vec<&PlannedOperation>> = BTreeMap::new();
    for op in &context.planned_operations {
        by_test_pack.entry(op.test_pack.as_str()).or_default().push(op);
    }

    for (test_pack, operations) in by_test_pack {
        println!("\nTest pack: {test_pack}");
        println!("{}", "-".repeat(test_pack.len() + 11));
        for op in operations {
            match &op.operation_type {
                OperationType::Copy => println!("Copy"),
                OperationType::Transform(label) => println!("Transform: {label}"),
            }
            println!("  From: {}", op.source.display());
            println!("  To:   {}", op.destination.display());
        }
    }

    println!("\nSummary:");
    println!("--------");
    println!("  Files to be copied:      {}", context.stats.files_copied);
    println!("  Files to be transformed: {}", context.stats.files_transformed);
    println!(
        "  Total operations:        {}",
        context.planned_operations.len()
    );
    println!("\nRun without --dry flag to generate these files.");
}

/// Lines describing the resolved test packs
///
/// Without a name there is one line per test pack. With a name there is one line per
/// entry of that test pack, and none when the name is unknown.
pub fn describe_test_packs(resolver: &Resolver, test_pack: Option<&str>) -> Result<Vec<String>> {
    let resolved = resolver.resolve_all()?;

    let Some(name) = test_pack else {
        return Ok(test_packs_of(&resolved)
            .into_iter()
            .map(|pack| {
                let count = resolved
                    .iter()
                    .filter(|entry| entry.test_pack == pack)
                    .count();
                let message = format!("{} ({}): {} samples", pack.name, pack.input_type, count);
                let colored_message = format!(
                    "{} ({}): {} samples",
                    pack.name.bold(),
                    pack.input_type,
                    count
                );
                format_message(&message, &colored_message)
            })
            .collect());
    };

    let entries = resolver.lookup(name)?;
    if entries.is_empty() {
        warn!("Unknown test pack: {name}");
    }

    Ok(entries
        .iter()
        .map(|entry| {
            format!(
                "{} -> {} ({})",
                entry.sample_location,
                target_location(entry),
                entry.transform.label()
            )
        })
        .collect())
}

/// Prints the resolved test packs, or the entries of one of them
pub fn list_test_packs(options: &ConfigOptions, test_pack: Option<&str>) -> Result<()> {
    let config = prepare_config(options)?;
    let resolver = resolver_for(&config)?;
    for line in describe_test_packs(&resolver, test_pack)? {
        println!("{line}");
    }
    Ok(())
}
