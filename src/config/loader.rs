//! Configuration loading functionality
//!
//! This module contains functions for locating, loading, merging and validating
//! the test pack table.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde_yaml::from_str;
use shellexpand::tilde;

use crate::errors::config_parsing_error;
use crate::utils::find_project_folder;

use super::model::Config;

/// The table shipped with the binary, used when no configuration file is found
pub const BUILTIN_CONFIG: &str = include_str!("testpacks.yaml");

/// Merges a parent configuration with a child configuration
///
/// Directories set by the child win. Test packs are combined, with the child's
/// declaration winning on a name clash. Child entries come before the parent's.
fn merge_configs(parent: Config, mut child: Config) -> Config {
    if child.resource_root.is_none() {
        child.resource_root = parent.resource_root;
    }

    if child.output.is_none() {
        child.output = parent.output;
    }

    for pack in parent.test_packs {
        if child.test_pack(&pack.name).is_none() {
            child.test_packs.push(pack);
        }
    }

    child.entries.extend(parent.entries);

    if child.bootstrap.is_none() {
        child.bootstrap = parent.bootstrap;
    }

    child.parent = None;
    child
}

/// Parses configuration text without resolving a parent or validating
///
/// # Arguments
/// * `content` - YAML text
/// * `origin` - Where the text came from, used in error messages
pub fn parse_config(content: &str, origin: &str) -> Result<Config> {
    let config: Config = from_str(content).map_err(|e| {
        config_parsing_error(
            e,
            &format!("Failed to parse configuration {origin}. Please check the YAML syntax."),
        )
    })?;
    Ok(config)
}

fn read_config_file(file: &Path) -> Result<Config> {
    let file_content = fs::read(file).map_err(|e| {
        anyhow!(
            "Failed to read configuration file {}: {}",
            file.display(),
            e
        )
    })?;

    let content_str = String::from_utf8(file_content).map_err(|e| {
        anyhow!(
            "Configuration file {} contains invalid UTF-8 characters: {}",
            file.display(),
            e
        )
    })?;

    parse_config(&content_str, &file.display().to_string())
}

/// Reads a configuration file and folds in its parent chain
fn load_with_parents(file: &Path) -> Result<Config> {
    let config = read_config_file(file)?;

    let Some(parent_path) = config.parent.clone() else {
        return Ok(config);
    };
    debug!("Loading parent configuration from {parent_path}");

    let parent_file = if Path::new(&parent_path).is_absolute() || parent_path.contains(':') {
        PathBuf::from(parent_path)
    } else {
        let mut parent_file = file.to_path_buf();
        parent_file.pop();
        parent_file.push(parent_path);
        parent_file
    };

    if !parent_file.exists() {
        return Err(anyhow!(
            "Parent configuration file {} specified in {} does not exist",
            parent_file.display(),
            file.display()
        ));
    }

    let parent_config = load_with_parents(&parent_file)
        .with_context(|| format!("Failed to load parent of {}", file.display()))?;

    Ok(merge_configs(parent_config, config))
}

/// Reads a configuration file and its parents without validating the result
pub fn read_config(file: &Path) -> Result<Config> {
    let config = load_with_parents(file)?;
    info!("Loaded configuration from {}", file.display());
    Ok(config)
}

/// Loads a configuration from a file
///
/// # Errors
/// Returns an error if the file cannot be read, a parent is missing, or the
/// merged configuration is invalid
pub fn load_config(file: PathBuf) -> Result<Config> {
    let config = read_config(&file)?;
    config.validate(true)?;
    Ok(config)
}

/// Loads a configuration from a file without checking path existence
///
/// This is primarily used for testing.
pub fn load_config_for_testing(file: PathBuf) -> Result<Config> {
    let config = load_with_parents(&file)?;
    config.validate(false)?;
    Ok(config)
}

/// Parses the table shipped with the binary without validating it
pub fn read_builtin_config() -> Result<Config> {
    debug!("Using the built-in test pack table");
    parse_config(BUILTIN_CONFIG, "built into the binary")
}

/// Loads the table shipped with the binary
pub fn load_builtin_config() -> Result<Config> {
    let config = read_builtin_config()?;
    config.validate(false)?;
    Ok(config)
}

/// Finds the configuration file to use
///
/// The path is used as given when it exists, otherwise it is looked up in the
/// platform configuration directory. `None` means the built-in table applies.
pub fn locate_config(config: PathBuf) -> Result<Option<PathBuf>> {
    if config.exists() {
        return Ok(Some(config));
    }

    let folder = find_project_folder()?;
    let candidate = folder.config_dir().join(&config);
    if candidate.exists() {
        Ok(Some(candidate))
    } else {
        debug!(
            "No configuration at {} or {}, using the built-in table",
            config.display(),
            candidate.display()
        );
        Ok(None)
    }
}

fn add_segment_to_path(segment: &str, path: &mut PathBuf) {
    if segment.starts_with('~') {
        path.push(tilde(segment).as_ref());
    } else if segment == ".." {
        path.pop();
    } else if segment == "." {
        if path.as_os_str().is_empty() {
            path.push(".");
        }
    } else {
        path.push(segment);
    }
}

fn path_from_segments<I: IntoIterator<Item = String>>(segments: I) -> PathBuf {
    let mut path = PathBuf::new();
    for segment in segments {
        add_segment_to_path(&segment, &mut path);
    }
    path
}

/// Deserialises a string or an array of path segments to a PathBuf
pub fn deserialize_from_array_to_pathbuf<'de, D>(
    deserializer: D,
) -> std::result::Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct PathBufVisitor;

    impl<'de> serde::de::Visitor<'de> for PathBufVisitor {
        type Value = PathBuf;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("string or array of strings")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(path_from_segments([value.to_string()]))
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            let mut segments = Vec::new();
            while let Some(segment) = seq.next_element::<String>()? {
                segments.push(segment);
            }
            Ok(path_from_segments(segments))
        }
    }

    deserializer.deserialize_any(PathBufVisitor)
}

/// Deserialises an optional string or array of path segments to a PathBuf
pub fn deserialize_from_array_to_optional_pathbuf<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct OptionalPathBufVisitor;

    impl<'de> serde::de::Visitor<'de> for OptionalPathBufVisitor {
        type Value = Option<PathBuf>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("string or array of strings")
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserialize_from_array_to_pathbuf(deserializer).map(Some)
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(path_from_segments([value.to_string()])))
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            let mut segments = Vec::new();
            while let Some(segment) = seq.next_element::<String>()? {
                segments.push(segment);
            }
            Ok(Some(path_from_segments(segments)))
        }
    }

    deserializer.deserialize_any(OptionalPathBufVisitor)
}
