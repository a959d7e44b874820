//! Configuration data structures
//!
//! This module contains the data structures for the test pack table.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::unknown_test_pack_error;
use crate::transform::TransformFunction;

use super::loader::{deserialize_from_array_to_optional_pathbuf, deserialize_from_array_to_pathbuf};

/// Default directory sample locations are resolved against
pub const DEFAULT_RESOURCE_ROOT: &str = ".";

/// Default directory generated test packs are written to
pub const DEFAULT_OUTPUT: &str = "test-packs";

/// A named grouping of sample fixtures sharing an input type
///
/// Two test packs are the same test pack when their names match.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TestPack {
    /// Display name, also used to derive the output directory
    pub name: String,
    /// Fully qualified name of the type the samples are turned into
    pub input_type: String,
}

impl TestPack {
    pub fn new(name: &str, input_type: &str) -> Self {
        TestPack {
            name: name.to_string(),
            input_type: input_type.to_string(),
        }
    }
}

impl PartialEq for TestPack {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TestPack {}

impl Hash for TestPack {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for TestPack {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TestPack {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// One row of the test pack table
///
/// A row whose sample location ends in `/` names a directory and stands for every
/// sample directly inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigEntry {
    pub test_pack: TestPack,
    pub sample_location: String,
    pub override_target_file_name: Option<String>,
    pub exclude_file_names: BTreeSet<String>,
    pub transform: TransformFunction,
}

impl ConfigEntry {
    pub fn new(test_pack: TestPack, sample_location: &str) -> Self {
        ConfigEntry {
            test_pack,
            sample_location: sample_location.to_string(),
            override_target_file_name: None,
            exclude_file_names: BTreeSet::new(),
            transform: TransformFunction::default(),
        }
    }

    /// Replaces the file name the sample is written under
    pub fn target_file_name(mut self, name: &str) -> Self {
        self.override_target_file_name = Some(name.to_string());
        self
    }

    /// Skips the named files when the entry is a directory
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_file_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn transform(mut self, transform: TransformFunction) -> Self {
        self.transform = transform;
        self
    }

    /// Whether the sample location names a directory rather than a file
    pub fn is_directory(&self) -> bool {
        self.sample_location.ends_with('/')
    }

    /// Copy of this entry pointing at a different sample location
    pub fn with_sample_location(&self, sample_location: String) -> Self {
        ConfigEntry {
            sample_location,
            ..self.clone()
        }
    }
}

/// An entry as written in the configuration file
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EntryDefinition {
    /// Name of a declared test pack
    pub test_pack: String,
    /// Sample file or directory, relative to the resource root
    pub sample: String,
    /// File name to write the sample under instead of its own
    #[serde(default)]
    pub target_file_name: Option<String>,
    /// File names skipped when `sample` is a directory
    #[serde(default)]
    pub exclude: BTreeSet<String>,
    #[serde(default)]
    pub transform: TransformFunction,
}

/// One source tree copied into the resource root by the bootstrap step
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BootstrapCopy {
    /// Directory relative to the bootstrap source base
    #[serde(deserialize_with = "deserialize_from_array_to_pathbuf")]
    pub from: PathBuf,
    /// Directory relative to the resource root
    #[serde(deserialize_with = "deserialize_from_array_to_pathbuf")]
    pub to: PathBuf,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ExpectationsConfig {
    /// Test pack directory relative to the resource root
    #[serde(deserialize_with = "deserialize_from_array_to_pathbuf")]
    pub test_pack: PathBuf,
    /// Replace expectation files that already exist
    #[serde(default)]
    pub overwrite: bool,
}

/// Settings for the `bootstrap` command
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BootstrapConfig {
    /// Extension of the raw sample files to copy
    #[serde(default = "default_bootstrap_extension")]
    pub extension: String,
    #[serde(default)]
    pub copies: Vec<BootstrapCopy>,
    pub expectations: Option<ExpectationsConfig>,
}

fn default_bootstrap_extension() -> String {
    crate::constants::BOOTSTRAP_EXTENSION.to_string()
}

/// The test pack table
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Directory sample locations are resolved against
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_from_array_to_optional_pathbuf")]
    pub resource_root: Option<PathBuf>,
    /// Directory generated test packs are written to
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_from_array_to_optional_pathbuf")]
    pub output: Option<PathBuf>,
    /// Path to parent configuration file for inheritance
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub test_packs: Vec<TestPack>,
    #[serde(default)]
    pub entries: Vec<EntryDefinition>,
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

impl Config {
    /// Directory sample locations are resolved against
    pub fn resource_root(&self) -> PathBuf {
        self.resource_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_ROOT))
    }

    /// Directory generated test packs are written to
    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Looks up a declared test pack by name
    pub fn test_pack(&self, name: &str) -> Option<&TestPack> {
        self.test_packs.iter().find(|pack| pack.name == name)
    }

    /// Builds the table rows, attaching each entry to its declared test pack
    ///
    /// # Errors
    /// Returns an error if an entry names a test pack that is not declared
    pub fn entries(&self) -> Result<Vec<ConfigEntry>> {
        self.entries
            .iter()
            .map(|definition| {
                let test_pack = self
                    .test_pack(&definition.test_pack)
                    .ok_or_else(|| unknown_test_pack_error(&definition.test_pack))?;

                let mut entry = ConfigEntry::new(test_pack.clone(), &definition.sample)
                    .excluding(definition.exclude.iter().cloned())
                    .transform(definition.transform.clone());
                entry.override_target_file_name = definition
                    .target_file_name
                    .clone()
                    .filter(|name| !name.trim().is_empty());
                Ok(entry)
            })
            .collect()
    }

    /// Validates the configuration
    ///
    /// # Arguments
    /// * `check_paths` - Whether to check that the resource root exists
    ///
    /// # Errors
    /// Returns an error with a detailed message if validation fails
    pub fn validate(&self, check_paths: bool) -> Result<()> {
        if self.test_packs.is_empty() {
            return Err(anyhow!(
                "No test packs specified in configuration. At least one test pack is required."
            ));
        }

        let mut names = HashSet::new();
        for (index, pack) in self.test_packs.iter().enumerate() {
            if pack.name.trim().is_empty() {
                return Err(anyhow!(
                    "Test pack at index {} has an empty name. Each test pack must have a name.",
                    index
                ));
            }
            if !names.insert(pack.name.as_str()) {
                return Err(anyhow!(
                    "Test pack '{}' is declared more than once.",
                    pack.name
                ));
            }
        }

        if self.entries.is_empty() {
            return Err(anyhow!(
                "No entries specified in configuration. At least one entry is required."
            ));
        }

        for (index, entry) in self.entries.iter().enumerate() {
            if self.test_pack(&entry.test_pack).is_none() {
                return Err(anyhow!(
                    "Entry at index {} references test pack '{}' which is not declared.",
                    index,
                    entry.test_pack
                ));
            }

            if entry.sample.trim().is_empty() {
                return Err(anyhow!(
                    "Entry at index {} has an empty sample location.",
                    index
                ));
            }

            if entry.sample.starts_with('/') || Path::new(&entry.sample).is_absolute() {
                return Err(anyhow!(
                    "Sample location '{}' must be relative to the resource root.",
                    entry.sample
                ));
            }

            if let Some(name) = &entry.target_file_name
                && name.contains('/')
            {
                return Err(anyhow!(
                    "Entry '{}' has an invalid target file name '{}'. It must be a plain file name.",
                    entry.sample,
                    name
                ));
            }

            if let TransformFunction::Command { program, .. } = &entry.transform
                && program.trim().is_empty()
            {
                return Err(anyhow!(
                    "Entry '{}' uses a command transform without a program.",
                    entry.sample
                ));
            }

            if !entry.exclude.is_empty() && !entry.sample.ends_with('/') {
                debug!(
                    "Exclusions on file entry '{}' have no effect",
                    entry.sample
                );
            }
        }

        if check_paths {
            let root = self.resource_root();
            if !root.exists() {
                return Err(anyhow!(
                    "Resource root does not exist: {}\n{}",
                    root.display(),
                    "Please check the path and ensure it exists."
                ));
            }

            if !root.is_dir() {
                return Err(anyhow!(
                    "Resource root is not a directory: {}\n{}",
                    root.display(),
                    "Please specify a valid directory path."
                ));
            }
        }

        Ok(())
    }
}
