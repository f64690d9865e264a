//! Tests for backend error display and classification.

use super::BackendError;

#[test]
fn api_error_displays_backend_message_verbatim() {
    let err = BackendError::Api {
        status: 422,
        message: "X".to_string(),
        body: Some(r#"{"message":"X"}"#.to_string()),
    };

    assert_eq!(err.to_string(), "X");
}

#[test]
fn no_response_is_distinct_from_api_errors() {
    let err = BackendError::NoResponse {
        detail: "connection refused".to_string(),
    };

    assert!(err.to_string().contains("No response received"));
}

#[test]
fn invalid_response_names_the_decode_failure() {
    let err = BackendError::InvalidResponse {
        message: "expected value at line 1".to_string(),
    };

    assert!(err.to_string().starts_with("Invalid response from backend"));
}
