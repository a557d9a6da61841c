#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{build, class, m2m_fixture};
use puregraph_core::errors::GraphError;
use puregraph_core::logging_facility::test_capture::init_test_capture;
use puregraph_core::{log_op_end, log_op_error, log_op_start};
use puregraph_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, element_path = "model::Foo");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field("element_path"), Some("model::Foo"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = GraphError::ElementNotFound {
        segment: "Foo".to_string(),
        path: "model::Foo".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one error event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field("err.code"), Some("ERR_NOT_FOUND"));
}

#[test]
fn test_successful_build_logs_start_and_end() {
    let capture = init_test_capture();

    let graph = build(&m2m_fixture());
    assert!(graph.build_state().has_succeeded());

    capture.assert_event_exists("graph_build", EVENT_START);
    capture.assert_event_exists("graph_build", EVENT_END);
    let started_with_fixture = capture
        .events_for_op("graph_build")
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_START) && e.field("entity_count") == Some("6"));
    assert!(started_with_fixture);
}

#[test]
fn test_failed_build_logs_error_with_code() {
    let capture = init_test_capture();

    let graph = build(&[class("model::A", &[("x", "model::Missing")])]);
    assert!(graph.build_state().has_failed());

    let events = capture.events_for_op("graph_build");
    let error = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("end_error event");
    assert_eq!(error.field("err.code"), Some("ERR_BUILD_FAILED"));

    // each link error is reported on its own
    let warned = capture.events().into_iter().any(|e| {
        e.field("err.code") == Some("ERR_UNRESOLVED_REFERENCE")
            && e.field("element_path") == Some("model::A")
    });
    assert!(warned);
}
