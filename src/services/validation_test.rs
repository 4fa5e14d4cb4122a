use super::*;

// =============================================================================
// validate_email
// =============================================================================

#[test]
fn accepts_common_addresses() {
    for email in ["user@example.com", "user+tag@example.com", "first.last@mail.example.co", "u1@my-site.io"] {
        assert!(validate_email("email", email).is_ok(), "expected {email:?} to be valid");
    }
}

#[test]
fn rejects_empty_as_required() {
    let err = validate_email("email", "").unwrap_err();
    assert_eq!(err.code, "required");
    assert_eq!(err.field.as_deref(), Some("email"));
}

#[test]
fn rejects_malformed_addresses() {
    for email in ["plainaddress", "@example.com", "user@", "user@@example.com", "user@example", "a b@example.com"] {
        let err = validate_email("email", email).unwrap_err();
        assert_eq!(err.code, "invalid_format", "unexpected code for {email:?}");
    }
}

#[test]
fn rejects_overlong_address() {
    let email = format!("{}@example.com", "a".repeat(MAX_EMAIL_LENGTH));
    let err = validate_email("email", &email).unwrap_err();
    assert_eq!(err.code, "too_long");
}

// =============================================================================
// ValidationErrors::to_details
// =============================================================================

#[test]
fn details_group_errors_by_field() {
    let mut errors = ValidationErrors::new();
    errors.push(ValidationError::field("email", "required", "Email is required"));
    errors.push(ValidationError::field("role", "invalid_enum", "bad role"));
    errors.push(ValidationError::field("role", "second", "another"));

    let details = errors.to_details();
    assert_eq!(details["errors"].as_array().map(Vec::len), Some(0));
    assert_eq!(details["properties"]["email"]["errors"], json!(["Email is required"]));
    assert_eq!(details["properties"]["role"]["errors"], json!(["bad role", "another"]));
    assert!(details["properties"].get("id").is_none());
    assert!(details.get("fields").is_none());
}

#[test]
fn details_keep_body_level_errors_separate() {
    let errors = ValidationErrors::from(ValidationError::body("invalid_type", "Expected an object"));
    let details = errors.to_details();
    assert_eq!(details["errors"], json!(["Expected an object"]));
    assert!(details["properties"].as_object().is_some_and(Map::is_empty));
}

#[test]
fn for_field_filters() {
    let mut errors = ValidationErrors::new();
    errors.push(ValidationError::field("id", "required", "Id is required"));
    errors.push(ValidationError::body("x", "y"));
    assert_eq!(errors.for_field("id").count(), 1);
    assert_eq!(errors.for_field("email").count(), 0);
    assert!(!errors.is_empty());
}
