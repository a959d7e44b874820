//! Regulatory reporting test pack generator
//!
//! Sample event files below a resource root are grouped into named test packs,
//! passed through a transform and written below an output directory.

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod resolver;
pub mod transform;
pub mod utils;
pub mod workflow;

pub mod prelude {
    pub use crate::cli::{execute, get_log_file, get_matches, get_verbosity};
    pub use crate::config::{Config, ConfigEntry, TestPack};
    pub use crate::errors::{
        config_parsing_error, directory_not_found_error, file_operation_error, generic_error,
        glob_pattern_error, invalid_filename_error, path_operation_error,
        sample_not_found_error, transform_error, unknown_test_pack_error,
    };
    pub use crate::errors::{Error, Result};
    pub use crate::logging::{LogLevel, format_message, init_logger};
    pub use crate::resolver::{Resolver, target_location, test_packs_of};
    pub use crate::transform::TransformFunction;
}
