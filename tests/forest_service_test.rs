//! Tests for ForestService (JSON loading end to end)

use std::fs;

use tempfile::TempDir;

use pathtree::application::{ApplicationError, ForestService};
use pathtree::config::Settings;
use pathtree::domain::{CyclePolicy, DomainError, FieldNames, RecordId};
use pathtree::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write input file");
    path
}

#[test]
fn given_location_payload_when_loading_then_builds_labelled_forest() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_input(
        &temp,
        "locations.json",
        r#"{"objects": [
            {"id": 1, "name": "Nigeria", "parent_location_id": null},
            {"id": 2, "name": "Kano", "parent_location_id": 1},
            {"id": 3, "name": "Afghanistan", "parent_location_id": null}
        ]}"#,
    );
    let settings = Settings {
        fields: FieldNames {
            id: "id".into(),
            parent: "parent_location_id".into(),
            title: "name".into(),
        },
        ..Settings::default()
    };
    let service = ForestService::new(settings);

    // Act
    let records = service.load_path(&path).unwrap();
    let forest = service.build(records).unwrap();
    let labels: Vec<String> = service.labels(&forest).into_iter().map(|n| n.label).collect();

    // Assert
    assert_eq!(labels, ["Nigeria", "Nigeria > Kano", "Afghanistan"]);
}

#[test]
fn given_reader_input_when_loading_then_decodes_string_ids() {
    let service = ForestService::new(Settings::default());
    let input = r#"[{"id": "ng", "title": "Nigeria"}, {"id": "kn", "parent": "ng", "title": "Kano"}]"#;

    let records = service.load_reader(input.as_bytes()).unwrap();

    assert_eq!(records[1].parent, Some(RecordId::from("ng")));
}

#[test]
fn given_duplicate_ids_when_building_then_surfaces_domain_error() {
    let service = ForestService::new(Settings::default());
    let records = service
        .load_reader(r#"[{"id": 1, "title": "A"}, {"id": 1, "title": "B"}]"#.as_bytes())
        .unwrap();

    let result = service.build(records);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::DuplicateId(RecordId::Int(1))))
    ));
}

#[test]
fn given_reject_policy_when_building_cycle_then_errors() {
    let settings = Settings {
        cycle_policy: CyclePolicy::Reject,
        ..Settings::default()
    };
    let service = ForestService::new(settings);
    let records = service
        .load_reader(r#"[{"id": 1, "parent": 2}, {"id": 2, "parent": 1}]"#.as_bytes())
        .unwrap();

    assert!(matches!(
        service.build(records),
        Err(ApplicationError::Domain(DomainError::CycleDetected(_)))
    ));
}

#[test]
fn given_malformed_json_when_loading_then_errors_with_input() {
    let service = ForestService::new(Settings::default());

    let result = service.load_reader("[{".as_bytes());

    assert!(matches!(result, Err(ApplicationError::Input { .. })));
}

#[test]
fn given_missing_file_when_loading_then_errors_with_path_context() {
    let service = ForestService::new(Settings::default());

    let err = service
        .load_path(std::path::Path::new("/nonexistent/locations.json"))
        .unwrap_err();

    assert!(err.to_string().contains("/nonexistent/locations.json"));
}

#[test]
fn given_search_min_len_when_searching_then_honours_it() {
    let settings = Settings {
        search_min_len: 1,
        ..Settings::default()
    };
    let service = ForestService::new(settings);
    let records = service
        .load_reader(r#"[{"id": 1, "title": "Kano"}, {"id": 2, "title": "Lagos"}]"#.as_bytes())
        .unwrap();
    let forest = service.build(records).unwrap();
    let labeled = service.labels(&forest);

    let matches = service.search(&labeled, "k");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].label, "Kano");
}
