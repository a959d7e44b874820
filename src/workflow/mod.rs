//! Workflow module
//!
//! This module contains components for orchestrating the workflow steps.

mod bootstrap;
mod context;
mod engine;

pub use bootstrap::{
    BootstrapOptions, bootstrap_samples, copy_source_files, create_blank_expectations,
};
pub use context::{OperationType, PlannedOperation, WorkflowContext, WorkflowStats};
pub use engine::{
    ConfigOptions, GenerateOptions, describe_test_packs, generate_test_packs, list_test_packs,
    output_path, prepare_config, resolver_for,
};
