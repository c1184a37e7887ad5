// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role. Stored as plain text; anything unknown in the column is
/// treated as a customer rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Customer,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Customer => "customer",
      Role::Admin => "admin",
    }
  }

  pub fn from_db(value: &str) -> Self {
    match value {
      "admin" => Role::Admin,
      _ => Role::Customer,
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: Uuid,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub first_name: String,
  pub last_name: String,
  pub role: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn role(&self) -> Role {
    Role::from_db(&self.role)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_role_defaults_to_customer() {
    assert_eq!(Role::from_db("admin"), Role::Admin);
    assert_eq!(Role::from_db("customer"), Role::Customer);
    assert_eq!(Role::from_db("superuser"), Role::Customer);
  }
}
