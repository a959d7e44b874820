use std::path::PathBuf;
use testpack_gen::config::load_config_for_testing;

#[test]
fn test_config_inheritance() {
    // Load the child configuration file
    let config_path = PathBuf::from("tests/configs/child_config.yaml");
    let config = load_config_for_testing(config_path).unwrap();

    // The resource root is inherited, the output directory is the child's
    assert_eq!(config.resource_root(), PathBuf::from("resources"));
    assert_eq!(config.output(), PathBuf::from("child-output"));

    // The child declares Events again, the parent adds Rates and Collateral
    assert_eq!(config.test_packs.len(), 3);
    assert_eq!(
        config.test_pack("Events").unwrap().input_type,
        "drr.regulation.common.ReportableEvent"
    );

    // Child entries come first, then the parent's
    let samples: Vec<&str> = config.entries.iter().map(|e| e.sample.as_str()).collect();
    assert_eq!(
        samples,
        vec![
            "result-json-files/fpml-5-10/record-keeping/events/",
            "result-json-files/fpml-5-10/record-keeping/events/Partial-Novation.json",
            "result-json-files/fpml-5-10/record-keeping/products/rates/",
            "regulatory-reporting/input/collateral/Collateral-ex01.json",
        ]
    );

    // The bootstrap section comes from the parent
    let bootstrap = config.bootstrap.as_ref().unwrap();
    assert_eq!(bootstrap.extension, "xml");
    assert_eq!(bootstrap.copies.len(), 1);
    assert!(!bootstrap.expectations.as_ref().unwrap().overwrite);
}

#[test]
fn test_inherited_entries_resolve_test_packs() {
    let config_path = PathBuf::from("tests/configs/child_config.yaml");
    let config = load_config_for_testing(config_path).unwrap();

    let entries = config.entries().unwrap();
    assert_eq!(entries.len(), 4);
    assert!(
        entries
            .iter()
            .any(|e| e.test_pack.name == "Collateral" && !e.transform.is_copy())
    );
}

#[test]
fn test_missing_parent() {
    let config_path = PathBuf::from("tests/configs/orphan_config.yaml");
    let error = load_config_for_testing(config_path).err().unwrap();
    assert!(
        error.to_string().contains("does not exist"),
        "Error message should mention the missing parent: {error}"
    );
}
