/// Constants used throughout the application
///
/// This module centralises all constants used in the application to make
/// them easier to manage and update.

/// Qualifier string used for application identification
pub const QUALIFIER: &str = "com";

/// Organisation name used for application identification
pub const ORGANIZATION: &str = "Ondřej Vágner";

/// Application name used for identification
///
/// This is the name of the application used in various contexts like
/// configuration file paths and application identification.
pub const APPLICATION: &str = "testpack_gen";

/// Extension of the sample files picked up when a directory entry is expanded
pub const SAMPLE_EXTENSION: &str = "json";

/// Extension of the raw source files copied by the bootstrap step
pub const BOOTSTRAP_EXTENSION: &str = "xml";

/// Leading path segments stripped from a sample location to get its target location
pub const KNOWN_SAMPLE_PREFIXES: [&str; 2] = ["result-json-files/", "cdm-sample-files/"];

/// Name of the expectation file written into every bootstrapped sample directory
pub const EXPECTATIONS_FILE_NAME: &str = "expectations.json";

/// Help text for the config command-line option
pub const CONFIG_HELP: &str = "Read the test pack table from a specific config file";

/// Help text for the dry-run command-line option
pub const DRY_RUN_HELP: &str = "Plan the generation without reading or writing any files";

/// Help text for the verbose command-line option
pub const VERBOSE_HELP: &str = "Increase verbosity level (can be used multiple times)";

/// Help text for the log file command-line option
pub const LOG_FILE_HELP: &str = "Write the log to a specific file";

/// Help text for the local logging command-line option
pub const LOCAL_LOGGING_HELP: &str =
    "Write the log file to the current directory instead of the config directory";

pub const RESOURCE_ROOT_HELP: &str = "Directory that sample locations are resolved against";

pub const OUTPUT_HELP: &str = "Directory the generated test packs are written to";

pub const TEST_PACK_HELP: &str = "Only list the entries of this test pack";

pub const SOURCE_BASE_HELP: &str = "Base directory holding the raw contribution samples";

/// Default path for the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "testpacks.yaml";

/// Default log file name
pub const LOG_FILE_DEFAULT: &str = "tpgen.log";
