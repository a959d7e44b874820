use glob::PatternError;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while reading the test pack table and generating its files
///
/// Every one of them is fatal. The command line reports the error and exits with status 1.
#[derive(Debug)]
pub enum Error {
    /// A sample, output or expectation file could not be read, written or listed
    FileOperation {
        source: io::Error,
        path: PathBuf,
        operation: String,
    },
    /// The glob built for a sample directory is invalid
    GlobPattern {
        source: PatternError,
        pattern: String,
    },
    PathOperation { path: PathBuf, operation: String },
    /// The test pack table could not be parsed
    ConfigParsing {
        source: Box<dyn StdError + Send + Sync>,
        detail: String,
    },
    /// A path that has to be handled as text is not valid Unicode
    InvalidFilename { path: PathBuf },
    /// A directory entry points at a directory that does not exist below the resource root
    DirectoryNotFound { path: PathBuf },
    /// A file entry points at a sample that does not exist below the resource root
    SampleNotFound { path: PathBuf },
    /// An entry names a test pack that is not declared
    UnknownTestPack { name: String },
    /// A transform could not turn a sample into its report input
    Transform { transform: String, detail: String },
    Generic { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileOperation {
                path, operation, ..
            } => {
                write!(f, "Failed to {} file: {}", operation, path.display())
            }
            Error::GlobPattern { pattern, .. } => {
                write!(f, "Invalid glob pattern: {pattern}")
            }
            Error::PathOperation { path, operation } => {
                write!(f, "Failed to {} path: {}", operation, path.display())
            }
            Error::ConfigParsing { detail, .. } => {
                write!(f, "Configuration parsing error: {detail}")
            }
            Error::InvalidFilename { path } => {
                write!(f, "Filename is not valid unicode: {}", path.display())
            }
            Error::DirectoryNotFound { path } => {
                write!(f, "Sample directory not found: {}", path.display())
            }
            Error::SampleNotFound { path } => {
                write!(f, "Sample file not found: {}", path.display())
            }
            Error::UnknownTestPack { name } => {
                write!(f, "Unknown test pack: {name}")
            }
            Error::Transform { transform, detail } => {
                write!(f, "Transform '{transform}' failed: {detail}")
            }
            Error::Generic { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::FileOperation { source, .. } => Some(source),
            Error::GlobPattern { source, .. } => Some(source),
            Error::ConfigParsing { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::FileOperation {
            source: err,
            path: PathBuf::new(),
            operation: "perform operation on".to_string(),
        }
    }
}

/// Result of the resolver, transforms and file helpers
///
/// # Examples
/// ```
/// use std::path::Path;
/// use testpack_gen::prelude::{Result, sample_not_found_error};
///
/// fn require_sample(path: &Path) -> Result<()> {
///     if path.is_file() {
///         Ok(())
///     } else {
///         Err(sample_not_found_error(path.to_path_buf()))
///     }
/// }
///
/// assert!(require_sample(Path::new("no/such/sample.json")).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

pub fn file_operation_error(err: io::Error, path: PathBuf, operation: &str) -> Error {
    Error::FileOperation {
        source: err,
        path,
        operation: operation.to_string(),
    }
}

pub fn glob_pattern_error(err: PatternError, pattern: &str) -> Error {
    Error::GlobPattern {
        source: err,
        pattern: pattern.to_string(),
    }
}

pub fn path_operation_error(path: PathBuf, operation: &str) -> Error {
    Error::PathOperation {
        path,
        operation: operation.to_string(),
    }
}

/// Wraps a YAML or JSON error raised while reading `detail`
pub fn config_parsing_error<E: StdError + Send + Sync + 'static>(err: E, detail: &str) -> Error {
    Error::ConfigParsing {
        source: Box::new(err),
        detail: detail.to_string(),
    }
}

pub fn invalid_filename_error(path: PathBuf) -> Error {
    Error::InvalidFilename { path }
}

pub fn directory_not_found_error(path: PathBuf) -> Error {
    Error::DirectoryNotFound { path }
}

pub fn sample_not_found_error(path: PathBuf) -> Error {
    Error::SampleNotFound { path }
}

pub fn unknown_test_pack_error(name: &str) -> Error {
    Error::UnknownTestPack {
        name: name.to_string(),
    }
}

/// Error for the transform labelled `transform`
pub fn transform_error(transform: &str, detail: &str) -> Error {
    Error::Transform {
        transform: transform.to_string(),
        detail: detail.to_string(),
    }
}

pub fn generic_error(message: &str) -> Error {
    Error::Generic {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_operation_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = file_operation_error(io_error, PathBuf::from("out/events/ex01.json"), "write");

        assert_eq!(
            format!("{error}"),
            "Failed to write file: out/events/ex01.json"
        );
        assert!(error.source().is_some(), "IO error should be kept as source");
    }

    #[test]
    fn test_glob_pattern_error() {
        let pattern_error = glob::Pattern::new("[").err().unwrap();
        let error = glob_pattern_error(pattern_error, "events/[/*.json");

        assert!(format!("{error}").contains("events/[/*.json"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_config_parsing_error() {
        let yaml_error = serde_yaml::from_str::<Vec<String>>("{").unwrap_err();
        let error = config_parsing_error(yaml_error, "testpacks.yaml");

        assert!(format!("{error}").contains("testpacks.yaml"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_sample_errors() {
        let error = directory_not_found_error(PathBuf::from("samples/events/"));
        assert_eq!(format!("{error}"), "Sample directory not found: samples/events/");

        let error = sample_not_found_error(PathBuf::from("samples/events/new-trade.json"));
        assert_eq!(
            format!("{error}"),
            "Sample file not found: samples/events/new-trade.json"
        );
    }

    #[test]
    fn test_unknown_test_pack_error() {
        let error = unknown_test_pack_error("Rates");
        assert_eq!(format!("{error}"), "Unknown test pack: Rates");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_transform_error() {
        let error = transform_error("command drr-transform", "exit status 2");
        assert_eq!(
            format!("{error}"),
            "Transform 'command drr-transform' failed: exit status 2"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();

        assert!(format!("{error}").contains("Failed to perform operation on file"));
    }
}
