use std::fs::{self, create_dir_all, write};
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

const TABLE: &str = r#"
output: out
test_packs:
  - name: Events
    input_type: drr.regulation.common.TransactionReportInstruction
  - name: Custom Scenarios
    input_type: drr.regulation.common.TransactionReportInstruction
entries:
  - test_pack: Events
    sample: result-json-files/events/
  - test_pack: Custom Scenarios
    sample: result-json-files/custom/mockup-post-priced.json
    target_file_name: mockup-pre-enrich.json
    transform:
      name: json
"#;

fn workspace() -> TempDir {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    create_dir_all(root.join("result-json-files/events")).unwrap();
    create_dir_all(root.join("result-json-files/custom")).unwrap();
    write(root.join("result-json-files/events/ex01.json"), "{}").unwrap();
    write(
        root.join("result-json-files/custom/mockup-post-priced.json"),
        r#"{"trade":1}"#,
    )
    .unwrap();
    write(root.join("testpacks.yaml"), TABLE).unwrap();
    temp_dir
}

fn tpgen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tpgen").unwrap();
    cmd.current_dir(dir)
        .args(["-c", "testpacks.yaml", "-L", "-l", "tpgen.log"]);
    cmd
}

#[test]
fn test_generate() {
    let temp_dir = workspace();

    tpgen(temp_dir.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished generating 2 test packs"));

    let root = temp_dir.path();
    assert!(root.join("out/events/ex01.json").is_file());
    let generated =
        fs::read_to_string(root.join("out/custom-scenarios/mockup-pre-enrich.json")).unwrap();
    assert_eq!(generated, "{\n  \"trade\": 1\n}");
    assert!(root.join("tpgen.log").is_file());
}

#[test]
fn test_generate_dry_run() {
    let temp_dir = workspace();

    tpgen(temp_dir.path())
        .args(["generate", "--dry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test pack: Custom Scenarios"))
        .stdout(predicate::str::contains("Run without --dry flag"))
        .stdout(predicate::str::contains("Planned 2 test packs, nothing was written"))
        .stdout(predicate::str::contains("Finished generating").not());

    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn test_generate_with_output_override() {
    let temp_dir = workspace();

    tpgen(temp_dir.path())
        .args(["generate", "-o", "elsewhere"])
        .assert()
        .success();

    assert!(temp_dir.path().join("elsewhere/events/ex01.json").is_file());
}

#[test]
fn test_list() {
    let temp_dir = workspace();

    tpgen(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Events (drr.regulation.common.TransactionReportInstruction): 1 samples",
        ));

    tpgen(temp_dir.path())
        .args(["list", "--test-pack", "Custom Scenarios"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "result-json-files/custom/mockup-post-priced.json -> custom/mockup-pre-enrich.json (json)",
        ));
}

#[test]
fn test_missing_sample_directory_fails() {
    let temp_dir = workspace();
    fs::remove_dir_all(temp_dir.path().join("result-json-files/events")).unwrap();

    tpgen(temp_dir.path())
        .arg("generate")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Sample directory not found"));
}

#[test]
fn test_subcommand_is_required() {
    let temp_dir = workspace();
    tpgen(temp_dir.path()).assert().failure();
}
