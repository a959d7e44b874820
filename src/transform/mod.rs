//! Transform functions
//!
//! A transform turns the text of a sample into the text written to the test pack.
//! The business rules that map a reportable event onto a report instruction live
//! outside this crate and are reached through [`TransformFunction::Command`].

mod command;

use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, transform_error};

pub use command::run_command;

/// Function applied to a sample before it is written
///
/// # Examples
///
/// In a configuration file a transform is written as a tagged map:
///
/// ```yaml
/// transform:
///   name: command
///   program: drr-transform
///   args: ["reportable-event-to-instruction", "--role", "self"]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "name")]
pub enum TransformFunction {
    /// Writes the sample unchanged
    #[default]
    Copy,
    /// Parses the sample as JSON and writes it pretty-printed
    Json,
    /// Pipes the sample through an external program that prints a JSON object
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl TransformFunction {
    /// Applies the transform to the contents of a sample
    ///
    /// # Errors
    /// Returns an error if the input or the program output is not valid JSON,
    /// or if the external program cannot be run or exits unsuccessfully
    pub fn apply(&self, input: &str) -> Result<String> {
        trace!("Applying {} transform", self.label());
        match self {
            TransformFunction::Copy => Ok(input.to_string()),
            TransformFunction::Json => {
                let value: Value = serde_json::from_str(input)
                    .map_err(|e| transform_error(&self.label(), &e.to_string()))?;
                pretty(&self.label(), &value)
            }
            TransformFunction::Command { program, args } => {
                let output = run_command(program, args, input)?;
                let value: Value = serde_json::from_str(&output).map_err(|e| {
                    transform_error(&self.label(), &format!("output is not JSON: {e}"))
                })?;
                if !value.is_object() {
                    return Err(transform_error(
                        &self.label(),
                        "output is not a JSON object",
                    ));
                }
                pretty(&self.label(), &value)
            }
        }
    }

    /// Whether the transform writes the sample without changing it
    pub fn is_copy(&self) -> bool {
        matches!(self, TransformFunction::Copy)
    }

    /// Short human-readable name, used in logs and listings
    pub fn label(&self) -> String {
        match self {
            TransformFunction::Copy => "copy".to_string(),
            TransformFunction::Json => "json".to_string(),
            TransformFunction::Command { program, args } if args.is_empty() => program.clone(),
            TransformFunction::Command { program, args } => {
                format!("{} {}", program, args.join(" "))
            }
        }
    }
}

fn pretty(label: &str, value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| transform_error(label, &e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_keeps_input() {
        let input = "{ \"eventDate\" : \"2024-03-01\" }\n";
        assert_eq!(TransformFunction::Copy.apply(input).unwrap(), input);
    }

    #[test]
    fn test_json_pretty_prints() {
        let output = TransformFunction::Json
            .apply(r#"{"reportableEvent":{"eventDate":"2024-03-01"}}"#)
            .unwrap();
        assert_eq!(
            output,
            "{\n  \"reportableEvent\": {\n    \"eventDate\": \"2024-03-01\"\n  }\n}"
        );
    }

    #[test]
    fn test_json_rejects_invalid_input() {
        let result = TransformFunction::Json.apply("<FpML/>");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("json"));
    }

    #[test]
    fn test_label() {
        assert_eq!(TransformFunction::Copy.label(), "copy");
        let command = TransformFunction::Command {
            program: "drr-transform".to_string(),
            args: vec!["collateral".to_string()],
        };
        assert_eq!(command.label(), "drr-transform collateral");
    }

    #[test]
    fn test_deserialize_tagged() {
        let transform: TransformFunction =
            serde_yaml::from_str("name: command\nprogram: drr-transform\nargs: [self]").unwrap();
        assert_eq!(
            transform,
            TransformFunction::Command {
                program: "drr-transform".to_string(),
                args: vec!["self".to_string()],
            }
        );

        let transform: TransformFunction = serde_yaml::from_str("name: json").unwrap();
        assert_eq!(transform, TransformFunction::Json);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_output_is_pretty_printed() {
        let transform = TransformFunction::Command {
            program: "cat".to_string(),
            args: Vec::new(),
        };
        let output = transform.apply(r#"{"trade":{"id":"UTI-1"}}"#).unwrap();
        assert_eq!(output, "{\n  \"trade\": {\n    \"id\": \"UTI-1\"\n  }\n}");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_output_must_be_an_object() {
        let transform = TransformFunction::Command {
            program: "cat".to_string(),
            args: Vec::new(),
        };
        let error = transform.apply("[1, 2]").unwrap_err();
        assert!(error.to_string().contains("not a JSON object"));
    }
}
