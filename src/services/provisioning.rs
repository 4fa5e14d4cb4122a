//! User provisioning — payload validation, staff association, upsert.
//!
//! Called once per login from the client flow after the identity provider has
//! issued an id. Safe to call repeatedly for the same id.

use serde_json::Value;

use super::store::UserStore;
use super::validation::{ValidationError, ValidationErrors, validate_email};
use crate::models::{Role, UserRecord};

/// A validated `POST /api/ensure-user` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The staff restaurant lookup failed. Nothing was written.
    #[error("{0}")]
    Lookup(#[source] sqlx::Error),
    /// The upsert itself failed.
    #[error("{0}")]
    Write(#[source] sqlx::Error),
}

/// Validate a decoded JSON body against `{ id, email, role? }`.
///
/// Unknown keys are ignored. `role` may be absent but not `null`.
///
/// # Errors
///
/// Returns every field that failed, or a single body-level error when the
/// payload is not an object.
pub fn parse_new_user(body: &Value) -> Result<NewUser, ValidationErrors> {
    let Some(obj) = body.as_object() else {
        return Err(ValidationError::body("invalid_type", "Expected an object").into());
    };

    let mut errors = ValidationErrors::new();

    let id = match required_string(obj.get("id"), "id") {
        Ok(id) if id.is_empty() => {
            errors.push(ValidationError::field("id", "too_small", "Id must not be empty"));
            None
        }
        Ok(id) => Some(id),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let email = match required_string(obj.get("email"), "email") {
        Ok(email) => match validate_email("email", email) {
            Ok(()) => Some(email),
            Err(e) => {
                errors.push(e);
                None
            }
        },
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let role = match obj.get("role") {
        None => Some(Role::default()),
        Some(Value::String(raw)) => Role::parse(raw).or_else(|| {
            errors.push(ValidationError::field(
                "role",
                "invalid_value",
                format!("Invalid option: expected one of \"customer\"|\"staff\", got {raw:?}"),
            ));
            None
        }),
        Some(other) => {
            errors.push(ValidationError::field(
                "role",
                "invalid_type",
                format!("Expected string, received {}", json_kind(other)),
            ));
            None
        }
    };

    match (id, email, role) {
        (Some(id), Some(email), Some(role)) if errors.is_empty() => {
            Ok(NewUser { id: id.to_owned(), email: email.to_owned(), role })
        }
        _ => Err(errors),
    }
}

fn required_string<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a str, ValidationError> {
    match value {
        None => Err(ValidationError::field(field, "required", format!("{} is required", capitalize(field)))),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(ValidationError::field(
            field,
            "invalid_type",
            format!("Expected string, received {}", json_kind(other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve the staff association (if any) and upsert the user record.
///
/// Performs at most one read (staff only) followed by exactly one write.
///
/// # Errors
///
/// `ProvisionError::Lookup` aborts before any write; `ProvisionError::Write`
/// carries the store's error for the upsert.
pub async fn ensure_user(store: &dyn UserStore, new_user: NewUser) -> Result<UserRecord, ProvisionError> {
    let restaurant_id = match new_user.role {
        Role::Staff => store
            .first_restaurant_id()
            .await
            .map_err(ProvisionError::Lookup)?,
        Role::Customer => None,
    };

    if new_user.role == Role::Staff && restaurant_id.is_none() {
        tracing::warn!(user_id = %new_user.id, "no restaurant available for staff user");
    }

    let record = UserRecord { id: new_user.id, email: new_user.email, role: new_user.role, restaurant_id };
    store
        .upsert_user(&record)
        .await
        .map_err(ProvisionError::Write)?;

    tracing::info!(user_id = %record.id, role = %record.role, restaurant_id = ?record.restaurant_id, "user provisioned");
    Ok(record)
}

#[cfg(test)]
#[path = "provisioning_test.rs"]
mod tests;
