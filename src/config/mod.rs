//! Configuration module
//!
//! This module contains components for loading and validating the test pack table.

mod loader;
mod model;

pub use loader::{
    BUILTIN_CONFIG, deserialize_from_array_to_optional_pathbuf, deserialize_from_array_to_pathbuf,
    load_builtin_config, load_config, load_config_for_testing, locate_config, parse_config,
    read_builtin_config, read_config,
};
pub use model::{
    BootstrapConfig, BootstrapCopy, Config, ConfigEntry, DEFAULT_OUTPUT, DEFAULT_RESOURCE_ROOT,
    EntryDefinition, ExpectationsConfig, TestPack,
};
