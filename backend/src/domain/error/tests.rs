//! Tests for the domain error payload.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
fn invalid_request_constructor_sets_code() {
    let err = Error::invalid_request("bad");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(err.cause().is_none());
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn summarised_moves_message_into_cause() {
    let err = Error::internal("pool timed out").summarised("Error fetching stock");
    assert_eq!(err.message(), "Error fetching stock");
    assert_eq!(err.cause(), Some("pool timed out"));
    assert_eq!(err.to_string(), "Error fetching stock: pool timed out");
}

#[rstest]
fn summarised_keeps_the_first_cause() {
    let err = Error::internal("root cause")
        .summarised("inner summary")
        .summarised("outer summary");
    assert_eq!(err.message(), "outer summary");
    assert_eq!(err.cause(), Some("root cause"));
}

#[rstest]
fn summarised_leaves_not_found_untouched() {
    let err = Error::not_found("Stock item not found").summarised("Error fetching stock item");
    assert_eq!(err.message(), "Stock item not found");
    assert!(err.cause().is_none());
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields(expected_trace_id: String) {
    let err = Error::invalid_request("category is not allowed")
        .with_details(json!({"field": "category"}))
        .with_trace_id(expected_trace_id.clone())
        .summarised("Error creating stock item");

    let value = serde_json::to_value(&err).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "Error creating stock item",
            "error": "category is not allowed",
            "details": {"field": "category"},
            "traceId": expected_trace_id,
        })
    );

    let bare = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    assert_eq!(bare, json!({"code": "not_found", "message": "missing"}));
}

#[rstest]
fn with_code_keeps_message_and_details() {
    let err = Error::invalid_request("bad")
        .with_details(json!({"field": "quantity"}))
        .with_code(ErrorCode::InternalError);
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "bad");
    assert!(err.details().is_some());
}
