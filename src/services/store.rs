//! Backing-store access for restaurants and users.
//!
//! DESIGN
//! ======
//! Handlers reach the store through the `UserStore` trait so the provisioning
//! rules can be exercised against an in-memory double. `PgUserStore` is the
//! production implementation; it wraps the pool built once at startup.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Restaurant, UserRecord};

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Return the id of any one restaurant, or `None` when the table is empty.
    /// No ordering is applied.
    async fn first_restaurant_id(&self) -> Result<Option<Uuid>, sqlx::Error>;

    /// Insert `user`, or overwrite the existing row with the same `id`.
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), sqlx::Error>;

    /// Read at most `limit` restaurants.
    async fn list_restaurants(&self, limit: i64) -> Result<Vec<Restaurant>, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn first_restaurant_id(&self) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM restaurants LIMIT 1")
            .fetch_optional(&self.pool)
            .await
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"INSERT INTO users (id, email, role, restaurant_id)
              VALUES ($1, $2, $3, $4)
              ON CONFLICT (id) DO UPDATE SET
                  email = EXCLUDED.email,
                  role = EXCLUDED.role,
                  restaurant_id = EXCLUDED.restaurant_id,
                  updated_at = now()",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.restaurant_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_restaurants(&self, limit: i64) -> Result<Vec<Restaurant>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, name FROM restaurants LIMIT $1")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|r| Restaurant { id: r.get("id"), name: r.get("name") })
            .collect())
    }
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "store_test.rs"]
mod tests;
