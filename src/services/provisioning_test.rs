use std::sync::atomic::Ordering;

use serde_json::json;

use super::*;
use crate::state::test_helpers::MemoryStore;

fn new_user(id: &str, email: &str, role: Role) -> NewUser {
    NewUser { id: id.into(), email: email.into(), role }
}

// =============================================================================
// parse_new_user
// =============================================================================

#[test]
fn parse_defaults_role_to_customer() {
    let parsed = parse_new_user(&json!({ "id": "uid-1", "email": "a@example.com" })).unwrap();
    assert_eq!(parsed, new_user("uid-1", "a@example.com", Role::Customer));
}

#[test]
fn parse_accepts_staff_and_ignores_unknown_keys() {
    let parsed =
        parse_new_user(&json!({ "id": "uid-2", "email": "s@example.com", "role": "staff", "extra": 1 })).unwrap();
    assert_eq!(parsed.role, Role::Staff);
}

#[test]
fn parse_reports_missing_email() {
    let errors = parse_new_user(&json!({ "id": "uid-1" })).unwrap_err();
    let email: Vec<_> = errors.for_field("email").collect();
    assert_eq!(email.len(), 1);
    assert_eq!(email[0].code, "required");
    assert_eq!(errors.for_field("id").count(), 0);
}

#[test]
fn parse_reports_every_failing_field() {
    let errors = parse_new_user(&json!({ "id": 42, "email": "nope", "role": "admin" })).unwrap_err();
    assert_eq!(errors.for_field("id").next().map(|e| e.code), Some("invalid_type"));
    assert_eq!(errors.for_field("email").next().map(|e| e.code), Some("invalid_format"));
    assert_eq!(errors.for_field("role").next().map(|e| e.code), Some("invalid_value"));
}

#[test]
fn parse_rejects_empty_id() {
    let errors = parse_new_user(&json!({ "id": "", "email": "a@example.com" })).unwrap_err();
    assert_eq!(errors.for_field("id").next().map(|e| e.code), Some("too_small"));
}

#[test]
fn parse_rejects_null_role() {
    let errors = parse_new_user(&json!({ "id": "u", "email": "a@example.com", "role": null })).unwrap_err();
    let role = errors.for_field("role").next().unwrap();
    assert_eq!(role.code, "invalid_type");
    assert!(role.message.contains("null"));
}

#[test]
fn parse_rejects_non_object_body() {
    for body in [json!([1, 2]), json!("str"), json!(null)] {
        let errors = parse_new_user(&body).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert!(errors.errors()[0].field.is_none());
    }
}

#[test]
fn parse_role_is_case_sensitive() {
    assert!(parse_new_user(&json!({ "id": "u", "email": "a@example.com", "role": "Staff" })).is_err());
}

// =============================================================================
// ensure_user
// =============================================================================

#[tokio::test]
async fn customer_gets_no_restaurant_and_skips_lookup() {
    let store = MemoryStore::with_restaurants(&["Diner"]);
    let record = ensure_user(&store, new_user("c1", "c@example.com", Role::Customer))
        .await
        .unwrap();

    assert_eq!(record.role, Role::Customer);
    assert!(record.restaurant_id.is_none());
    assert_eq!(store.reads.load(Ordering::SeqCst), 0);
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    assert_eq!(store.user("c1"), Some(record));
}

#[tokio::test]
async fn staff_is_associated_with_an_existing_restaurant() {
    let store = MemoryStore::with_restaurants(&["Diner", "Bistro"]);
    let record = ensure_user(&store, new_user("s1", "s@example.com", Role::Staff))
        .await
        .unwrap();

    let restaurant_id = record.restaurant_id.expect("staff should be associated");
    assert!(store.restaurant_ids().contains(&restaurant_id));
    assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn staff_without_restaurants_is_written_with_null_association() {
    let store = MemoryStore::new();
    let record = ensure_user(&store, new_user("s2", "s@example.com", Role::Staff))
        .await
        .unwrap();

    assert_eq!(record.role, Role::Staff);
    assert!(record.restaurant_id.is_none());
    assert_eq!(store.user_count(), 1);
}

#[tokio::test]
async fn repeated_calls_overwrite_the_same_identity() {
    let store = MemoryStore::new();
    ensure_user(&store, new_user("dup", "first@example.com", Role::Customer))
        .await
        .unwrap();
    ensure_user(&store, new_user("dup", "second@example.com", Role::Customer))
        .await
        .unwrap();

    assert_eq!(store.user_count(), 1);
    assert_eq!(store.user("dup").map(|u| u.email).as_deref(), Some("second@example.com"));
}

#[tokio::test]
async fn lookup_failure_aborts_before_write() {
    let store = MemoryStore::with_restaurants(&["Diner"]);
    store.fail_lookup_with("restaurants unavailable");

    let err = ensure_user(&store, new_user("s3", "s@example.com", Role::Staff))
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Lookup(_)));
    assert!(err.to_string().contains("restaurants unavailable"));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    assert_eq!(store.user_count(), 0);
}

#[tokio::test]
async fn write_failure_surfaces_store_message() {
    let store = MemoryStore::new();
    store.fail_write_with("duplicate key value violates constraint");

    let err = ensure_user(&store, new_user("w1", "w@example.com", Role::Customer))
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Write(_)));
    assert!(err.to_string().contains("duplicate key value violates constraint"));
    assert_eq!(store.user_count(), 0);
}
