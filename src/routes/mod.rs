//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the provisioning API, the store diagnostic page and the liveness
//! probe under a single Axum router. Panics inside a handler are converted to
//! a JSON 500 by the outermost layer so one bad request cannot take the
//! process down.

pub mod diagnostics;
pub mod users;

use std::any::Any;

use axum::Router;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/api/ensure-user", post(users::ensure_user))
        .route("/test", get(diagnostics::store_test_page))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "Server error".to_owned()
    };
    tracing::error!(%message, "handler panicked");

    let body = serde_json::json!({ "error": message }).to_string();
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
