//! User provisioning route.

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};

use crate::services::provisioning::{self, ProvisionError};
use crate::state::AppState;

/// `POST /api/ensure-user` — validate `{id, email, role?}` and upsert the user row.
///
/// The body is taken as raw bytes, rejection included, so an unreadable,
/// oversized or malformed payload is reported as a JSON 500 instead of Axum's
/// plain-text extractor rejection.
pub async fn ensure_user(State(state): State<AppState>, body: Result<Bytes, BytesRejection>) -> Response {
    let body = match body {
        Ok(b) => b,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "ensure-user body could not be read");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &rejection.body_text());
        }
    };

    let json: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "ensure-user body is not valid JSON");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    let new_user = match provisioning::parse_new_user(&json) {
        Ok(u) => u,
        Err(errors) => {
            tracing::info!(failures = errors.errors().len(), "ensure-user body rejected");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid body", "details": errors.to_details() })),
            )
                .into_response();
        }
    };

    match provisioning::ensure_user(state.store.as_ref(), new_user).await {
        Ok(_) => Json(json!({ "ok": true })).into_response(),
        Err(e) => {
            let status = provision_error_to_status(&e);
            tracing::error!(error = %e, "ensure-user failed");
            error_response(status, &e.to_string())
        }
    }
}

pub(crate) fn provision_error_to_status(err: &ProvisionError) -> StatusCode {
    match err {
        ProvisionError::Lookup(_) | ProvisionError::Write(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
