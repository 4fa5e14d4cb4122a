//! Row and enum types shared by the server routes and the login client.

use serde::Serialize;
use uuid::Uuid;

/// Application role stored on a user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Staff,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Customer, Role::Staff];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
        }
    }

    /// Parse the wire name. Case-sensitive.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == raw)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mirrors the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Identity issued by the auth provider.
    pub id: String,
    pub email: String,
    pub role: Role,
    pub restaurant_id: Option<Uuid>,
}

/// Mirrors the `restaurants` table (the columns this service reads).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
}
