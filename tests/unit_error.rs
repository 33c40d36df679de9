use std::path::PathBuf;

use chrono::NaiveDate;
use rplan::error::{exit_codes, Error, JsonError};
use rplan::model::{RecordKey, RecordKind};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let uninitialized = Error::NotInitialized(PathBuf::from("rplan.json"));
    assert_eq!(uninitialized.exit_code(), exit_codes::USER_ERROR);

    let stale = Error::NotFound(RecordKey::Task(1));
    assert_eq!(stale.exit_code(), exit_codes::STALE_DATA);

    let ambiguous = Error::AmbiguousKey {
        key: RecordKey::Project("Alpha".to_string()),
        matches: 2,
    };
    assert_eq!(ambiguous.exit_code(), exit_codes::STALE_DATA);

    let range = Error::InvalidRange {
        kind: RecordKind::Task,
        end: NaiveDate::MIN,
    };
    assert_eq!(range.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_code_and_details() {
    let err = Error::AmbiguousKey {
        key: RecordKey::Project("Alpha".to_string()),
        matches: 2,
    };
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::STALE_DATA);
    assert_eq!(json.kind, "stale_data");
    assert!(json.message.contains("project 'Alpha'"));
    let details = json.details.expect("details");
    assert_eq!(details["matches"], 2);
    assert_eq!(details["key"]["ref"], "Alpha");
}

#[test]
fn hints_point_at_the_next_command() {
    assert_eq!(
        Error::NotInitialized(PathBuf::from("rplan.json")).hint().as_deref(),
        Some("rplan init")
    );
    let stale = Error::NotFound(RecordKey::Task(4));
    assert_eq!(stale.kind(), "stale_data");
    assert!(stale.hint().is_some_and(|hint| hint.starts_with("rplan plan")));
    assert!(Error::InvalidRecord("bad".to_string()).hint().is_none());
}
