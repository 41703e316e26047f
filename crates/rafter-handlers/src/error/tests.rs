//! Unit tests for handler error display and structure.

use super::*;

#[test]
fn active_state_names_the_operation() {
    let err = HandlerError::ActiveState {
        operation: "capture".into(),
    };
    assert_eq!(
        err.to_string(),
        "operation 'capture' requires an inactive handler"
    );
}

#[test]
fn inactive_state_names_the_operation() {
    let err = HandlerError::InactiveState {
        operation: "iter_tables".into(),
    };
    assert_eq!(
        err.to_string(),
        "operation 'iter_tables' requires an active handler"
    );
}

#[test]
fn capture_active_is_self_describing() {
    let err = HandlerError::CaptureActive;
    assert!(err.to_string().contains("active handler"));
}

#[test]
fn key_not_found_names_the_key() {
    let err = HandlerError::KeyNotFound {
        key: "exposure_time".into(),
    };
    assert_eq!(err.to_string(), "key 'exposure_time' not found");
}

#[test]
fn frame_out_of_range_reports_index_and_len() {
    let err = HandlerError::FrameOutOfRange { index: 7, len: 3 };
    assert_eq!(
        err.to_string(),
        "frame index 7 out of range for source of length 3"
    );
}

#[test]
fn deserialize_params_carries_optional_source() {
    let err = HandlerError::DeserializeParams {
        message: "missing field `resolution_units`".into(),
        source: None,
    };
    assert!(err.to_string().contains("missing field"));
}
