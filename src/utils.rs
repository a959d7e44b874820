use std::fs::create_dir_all;
use std::path::{Component, Path, PathBuf};

use crate::constants::{APPLICATION, ORGANIZATION, QUALIFIER};
use crate::errors::{Result, generic_error, invalid_filename_error, path_operation_error};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use regex::Regex;

/// Directory name a test pack is written under: spaces and underscores become dashes, lowercased
pub fn directory_name(test_pack_name: &str) -> String {
    test_pack_name
        .replace([' ', '_'], "-")
        .trim()
        .to_lowercase()
}

/// Lowercases the parent directory, turns spaces into dashes and collapses repeated dashes
pub fn sanitize_path(path: &Path) -> Result<PathBuf> {
    static DASHES: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"-+").expect("Failed to compile regex pattern for DASHES")
    });

    let file_name = file_name_str(path)?;
    let parent = path
        .parent()
        .ok_or_else(|| path_operation_error(path.to_path_buf(), "get parent directory"))?;
    let parent = parent
        .to_str()
        .ok_or_else(|| invalid_filename_error(parent.to_path_buf()))?
        .to_lowercase();

    let joined = PathBuf::from(parent).join(file_name);
    let joined = joined
        .to_str()
        .ok_or_else(|| invalid_filename_error(joined.clone()))?
        .replace(' ', "-");

    Ok(PathBuf::from(DASHES.replace_all(&joined, "-").as_ref()))
}

pub fn normalise_line_endings(contents: &str) -> String {
    contents.replace("\r\n", "\n")
}

/// Returns the final component of a path as a string
pub fn file_name_str(path: &Path) -> Result<&str> {
    path.file_name()
        .ok_or_else(|| path_operation_error(path.to_path_buf(), "get filename"))?
        .to_str()
        .ok_or_else(|| invalid_filename_error(path.to_path_buf()))
}

/// Renders a relative path with forward slashes regardless of platform
pub fn to_slash_string(path: &Path) -> Result<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => segments.push(
                segment
                    .to_str()
                    .ok_or_else(|| invalid_filename_error(path.to_path_buf()))?,
            ),
            Component::CurDir => {}
            _ => return Err(path_operation_error(path.to_path_buf(), "relativize")),
        }
    }
    Ok(segments.join("/"))
}

pub(crate) fn find_project_folder() -> Result<ProjectDirs> {
    let folder = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| generic_error("Failed to determine project directories"))?;

    if !folder.config_dir().exists() {
        create_dir_all(folder.config_dir())?;
    }
    Ok(folder)
}
