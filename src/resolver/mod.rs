//! Test pack resolution
//!
//! This module turns the configured entries into the set of sample files that make up
//! each test pack, and works out where each sample is written.

mod expansion;
mod location;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::{ConfigEntry, TestPack};
use crate::errors::Result;

pub use expansion::expand_directory;
pub use location::target_location;

/// Resolves configured entries against a resource root
#[derive(Debug, Clone)]
pub struct Resolver {
    resource_root: PathBuf,
    entries: Vec<ConfigEntry>,
}

impl Resolver {
    pub fn new(resource_root: impl Into<PathBuf>, entries: Vec<ConfigEntry>) -> Self {
        Resolver {
            resource_root: resource_root.into(),
            entries,
        }
    }

    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }

    /// Every sample file entry, with directory entries expanded and duplicates removed
    ///
    /// # Errors
    /// Returns an error if a directory entry names a directory that does not exist
    pub fn resolve_all(&self) -> Result<BTreeSet<ConfigEntry>> {
        let mut resolved: BTreeSet<ConfigEntry> = self
            .entries
            .iter()
            .filter(|entry| !entry.is_directory())
            .cloned()
            .collect();

        for entry in self.entries.iter().filter(|entry| entry.is_directory()) {
            resolved.extend(expand_directory(&self.resource_root, entry)?);
        }

        debug!(
            "Resolved {} configured entries into {} samples",
            self.entries.len(),
            resolved.len()
        );
        Ok(resolved)
    }

    /// Distinct test packs of the resolved entries
    pub fn all_test_packs(&self) -> Result<BTreeSet<TestPack>> {
        Ok(test_packs_of(&self.resolve_all()?))
    }

    /// Resolved entries belonging to the named test pack
    ///
    /// An unknown name yields an empty set.
    pub fn lookup(&self, test_pack_name: &str) -> Result<BTreeSet<ConfigEntry>> {
        Ok(self
            .resolve_all()?
            .into_iter()
            .filter(|entry| entry.test_pack.name == test_pack_name)
            .collect())
    }
}

/// Distinct test packs referenced by a set of entries
pub fn test_packs_of<'a, I>(entries: I) -> BTreeSet<TestPack>
where
    I: IntoIterator<Item = &'a ConfigEntry>,
{
    entries
        .into_iter()
        .map(|entry| entry.test_pack.clone())
        .collect()
}
