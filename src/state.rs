//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! built once in `main` and holds the only handle to the backing store; no
//! request constructs its own client.

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::store::{PgUserStore, UserStore};

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// State backed by Postgres.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgUserStore::new(pool)))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
