use pantry::{PantryError, Result};

#[test]
fn test_error_display() {
    let err = PantryError::NotFound("no food found with id 7".to_string());
    assert!(err.to_string().contains("id 7"));
}

#[test]
fn test_invalid_message_displays_reason_only() {
    let err = PantryError::InvalidMessage("unknown command type 'foo'".to_string());
    assert_eq!(err.to_string(), "unknown command type 'foo'");
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(PantryError::Configuration("missing key".into()))
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Not-found classification
// ============================================================================

#[test]
fn not_found_errors() {
    assert!(PantryError::NotFound("x".into()).is_not_found());
    assert!(PantryError::BarcodeNotFound("123".into()).is_not_found());
}

#[test]
fn failures_are_not_not_found() {
    assert!(!PantryError::Http("connection reset".into()).is_not_found());
    assert!(!PantryError::InvalidArgument("negative".into()).is_not_found());
    assert!(
        !PantryError::Retrieval {
            operation: "get food report",
            key: "1".into(),
            reason: "HTTP 500".into(),
        }
        .is_not_found()
    );
}

#[test]
fn retrieval_error_names_operation_and_key() {
    let err = PantryError::Retrieval {
        operation: "get food by keywords",
        key: "beef soup".into(),
        reason: "fdc returned HTTP 503".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("get food by keywords"));
    assert!(msg.contains("'beef soup'"));
    assert!(msg.contains("503"));
}

#[test]
fn io_errors_convert() {
    fn fails() -> Result<()> {
        Err(std::io::Error::other("disk full"))?
    }
    assert!(matches!(fails(), Err(PantryError::Io(_))));
}
