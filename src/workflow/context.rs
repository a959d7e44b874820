//! Workflow context
//!
//! This module defines the context passed between workflow steps.

use std::path::PathBuf;

/// Represents a planned write for dry-run mode
#[derive(Debug, Clone)]
pub struct PlannedOperation {
    /// The sample the file is generated from
    pub source: PathBuf,
    /// The file that would be written
    pub destination: PathBuf,
    pub operation_type: OperationType,
    /// Name of the test pack the sample belongs to
    pub test_pack: String,
}

/// Type of generation step
#[derive(Debug, Clone, PartialEq)]
pub enum OperationType {
    /// The sample is written unchanged
    Copy,
    /// The sample is passed through the named transform
    Transform(String),
}

/// Outcome of a generate or bootstrap run
#[derive(Debug, Clone, Default)]
pub struct WorkflowContext {
    /// Statistics about the processing
    pub stats: WorkflowStats,
    /// Planned operations for dry-run mode
    pub planned_operations: Vec<PlannedOperation>,
}

/// Statistics about the workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowStats {
    /// Number of sample entries after expansion and deduplication
    pub entries_resolved: usize,
    /// Number of files written to the output directory
    pub files_written: usize,
    /// Number of samples passed through a transform
    pub files_transformed: usize,
    /// Number of samples written unchanged
    pub files_copied: usize,
    /// Number of raw source files copied in by the bootstrap step
    pub samples_bootstrapped: usize,
    /// Number of expectation files written by the bootstrap step
    pub expectations_written: usize,
}

impl WorkflowContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_planned_operation(&mut self, operation: PlannedOperation) {
        self.planned_operations.push(operation);
    }

    pub fn increment_files_written(&mut self) {
        self.stats.files_written += 1;
    }

    pub fn increment_files_transformed(&mut self) {
        self.stats.files_transformed += 1;
    }

    pub fn increment_files_copied(&mut self) {
        self.stats.files_copied += 1;
    }
}
