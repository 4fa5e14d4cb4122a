//! Restaurant login and user provisioning.
//!
//! The server half (`routes`, `services`, `db`) exposes `POST /api/ensure-user`
//! and a store diagnostic page; the `client` half drives sign-up / sign-in
//! against the identity provider and then calls the server.

pub mod client;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
