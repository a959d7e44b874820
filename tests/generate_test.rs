use std::fs::{self, create_dir_all, write};
use std::path::PathBuf;

use tempfile::{TempDir, tempdir};

use testpack_gen::workflow::{
    ConfigOptions, GenerateOptions, OperationType, describe_test_packs, generate_test_packs,
    prepare_config, resolver_for,
};

// Helper function to create a resource tree and a config file pointing at it
fn setup(table: &str) -> (TempDir, ConfigOptions) {
    let temp_dir = tempdir().unwrap();
    let resources = temp_dir.path().join("resources");
    let events = resources.join("result-json-files/fpml-5-10/record-keeping/events");
    create_dir_all(&events).unwrap();
    write(
        events.join("New-Trade-01.json"),
        r#"{"reportableEvent":{"eventDate":"2024-03-01"}}"#,
    )
    .unwrap();
    write(events.join("Partial-Novation.json"), r#"{"afterTrade":[1,2]}"#).unwrap();

    let config_path = temp_dir.path().join("testpacks.yaml");
    fs::write(&config_path, table).unwrap();

    let options = ConfigOptions {
        config_path,
        resource_root: Some(resources),
        output: Some(temp_dir.path().join("out")),
    };
    (temp_dir, options)
}

const TABLE: &str = r#"
test_packs:
  - name: Events
    input_type: drr.regulation.common.TransactionReportInstruction
  - name: CFTC Event Scenarios
    input_type: drr.regulation.common.TransactionReportInstruction
entries:
  - test_pack: Events
    sample: result-json-files/fpml-5-10/record-keeping/events/
    exclude: [Partial-Novation.json]
    transform:
      name: json
  - test_pack: Events
    sample: result-json-files/fpml-5-10/record-keeping/events/Partial-Novation.json
    target_file_name: partial-novation-new-trade.json
  - test_pack: CFTC Event Scenarios
    sample: result-json-files/fpml-5-10/record-keeping/events/New-Trade-01.json
"#;

fn out(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("out")
}

#[test]
fn test_generate_writes_test_packs() {
    let (temp_dir, options) = setup(TABLE);

    let context = generate_test_packs(GenerateOptions {
        config: options,
        dry_run: false,
    })
    .unwrap();

    assert_eq!(context.stats.entries_resolved, 3);
    assert_eq!(context.stats.files_written, 3);
    assert_eq!(context.stats.files_transformed, 1);
    assert_eq!(context.stats.files_copied, 2);

    let out = out(&temp_dir);
    let pretty = fs::read_to_string(out.join("events/New-Trade-01.json")).unwrap();
    assert_eq!(
        pretty,
        "{\n  \"reportableEvent\": {\n    \"eventDate\": \"2024-03-01\"\n  }\n}"
    );

    let copied = fs::read_to_string(out.join("events/partial-novation-new-trade.json")).unwrap();
    assert_eq!(copied, r#"{"afterTrade":[1,2]}"#);

    assert!(out.join("cftc-event-scenarios/New-Trade-01.json").is_file());
    assert!(!out.join("events/Partial-Novation.json").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let (temp_dir, options) = setup(TABLE);

    let context = generate_test_packs(GenerateOptions {
        config: options,
        dry_run: true,
    })
    .unwrap();

    assert_eq!(context.stats.files_written, 0);
    assert_eq!(context.planned_operations.len(), 3);
    assert!(
        context
            .planned_operations
            .iter()
            .any(|op| op.operation_type == OperationType::Transform("json".to_string()))
    );
    assert!(!out(&temp_dir).exists());
}

#[test]
fn test_missing_sample_file_is_fatal() {
    let table = r#"
test_packs:
  - name: Events
    input_type: drr.regulation.common.TransactionReportInstruction
entries:
  - test_pack: Events
    sample: result-json-files/fpml-5-10/record-keeping/events/Missing.json
"#;
    let (_temp_dir, options) = setup(table);

    let error = generate_test_packs(GenerateOptions {
        config: options,
        dry_run: false,
    })
    .unwrap_err();

    let message = format!("{error:#}");
    assert!(message.contains("Missing.json"), "{message}");
    assert!(message.contains("Sample file not found"), "{message}");
}

#[test]
fn test_invalid_json_is_fatal() {
    let table = r#"
test_packs:
  - name: Events
    input_type: drr.regulation.common.TransactionReportInstruction
entries:
  - test_pack: Events
    sample: result-json-files/fpml-5-10/record-keeping/events/broken.json
    transform:
      name: json
"#;
    let (temp_dir, options) = setup(table);
    write(
        temp_dir
            .path()
            .join("resources/result-json-files/fpml-5-10/record-keeping/events/broken.json"),
        "{ not json",
    )
    .unwrap();

    let result = generate_test_packs(GenerateOptions {
        config: options,
        dry_run: false,
    });
    assert!(result.is_err());
}

#[test]
fn test_duplicate_output_path_keeps_one_file() {
    let table = r#"
test_packs:
  - name: Events
    input_type: drr.regulation.common.TransactionReportInstruction
entries:
  - test_pack: Events
    sample: result-json-files/fpml-5-10/record-keeping/events/New-Trade-01.json
    target_file_name: same.json
  - test_pack: Events
    sample: result-json-files/fpml-5-10/record-keeping/events/Partial-Novation.json
    target_file_name: same.json
"#;
    let (temp_dir, options) = setup(table);

    let context = generate_test_packs(GenerateOptions {
        config: options,
        dry_run: false,
    })
    .unwrap();

    assert_eq!(context.stats.files_written, 2);
    let events_dir = out(&temp_dir).join("events");
    assert_eq!(fs::read_dir(&events_dir).unwrap().count(), 1);
    assert!(events_dir.join("same.json").is_file());
}

#[test]
fn test_describe_test_packs() {
    let (_temp_dir, options) = setup(TABLE);
    let config = prepare_config(&options).unwrap();
    let resolver = resolver_for(&config).unwrap();

    let packs = describe_test_packs(&resolver, None).unwrap();
    assert_eq!(
        packs,
        vec![
            "CFTC Event Scenarios (drr.regulation.common.TransactionReportInstruction): 1 samples",
            "Events (drr.regulation.common.TransactionReportInstruction): 2 samples",
        ]
    );

    let events = describe_test_packs(&resolver, Some("Events")).unwrap();
    assert!(events.contains(
        &"result-json-files/fpml-5-10/record-keeping/events/Partial-Novation.json -> \
          fpml-5-10/record-keeping/events/partial-novation-new-trade.json (copy)"
            .to_string()
    ));

    assert!(describe_test_packs(&resolver, Some("Rates")).unwrap().is_empty());
}

#[test]
fn test_command_line_overrides_win() {
    let (temp_dir, mut options) = setup(TABLE);
    options.output = Some(temp_dir.path().join("elsewhere"));

    let config = prepare_config(&options).unwrap();
    assert_eq!(config.output(), temp_dir.path().join("elsewhere"));
    assert!(config.resource_root().ends_with("resources"));
}

#[cfg(unix)]
#[test]
fn test_command_transform() {
    let table = r#"
test_packs:
  - name: Events
    input_type: drr.regulation.common.TransactionReportInstruction
entries:
  - test_pack: Events
    sample: result-json-files/fpml-5-10/record-keeping/events/New-Trade-01.json
    transform:
      name: command
      program: cat
"#;
    let (temp_dir, options) = setup(table);

    generate_test_packs(GenerateOptions {
        config: options,
        dry_run: false,
    })
    .unwrap();

    let written = fs::read_to_string(out(&temp_dir).join("events/New-Trade-01.json")).unwrap();
    assert!(written.starts_with("{\n  \"reportableEvent\""));
}
