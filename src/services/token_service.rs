// src/services/token_service.rs

//! Signed, time-limited session tokens (JWT, HS256) carrying identity and role.

use crate::errors::AppError;
use crate::models::user::Role;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// User id (subject)
  pub sub: Uuid,
  pub email: String,
  pub role: Role,
  pub iat: i64,
  pub exp: i64,
}

/// Issues a token for the given user, valid for `ttl_hours` from now.
pub fn issue_token(secret: &str, user_id: Uuid, email: &str, role: Role, ttl_hours: i64) -> Result<String, AppError> {
  let now = Utc::now();
  let claims = Claims {
    sub: user_id,
    email: email.to_string(),
    role,
    iat: now.timestamp(),
    exp: (now + Duration::hours(ttl_hours)).timestamp(),
  };

  encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validates a token and returns its claims. Expiry and signature failures
/// both surface as `AppError::Auth`, which the HTTP layer maps to 401.
pub fn validate_token(secret: &str, token: &str) -> Result<Claims, AppError> {
  let validation = Validation::new(Algorithm::HS256);
  let token_data =
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation).map_err(|e| match e.kind() {
      ErrorKind::ExpiredSignature => AppError::Auth("Token has expired".to_string()),
      ErrorKind::InvalidSignature => AppError::Auth("Invalid token signature".to_string()),
      _ => AppError::Auth(format!("Invalid token: {}", e)),
    })?;
  Ok(token_data.claims)
}

/// Extracts the bare token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(header: &str) -> Option<&str> {
  header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
  use super::*;

  const SECRET: &str = "unit-test-secret-key-that-is-long-enough";

  #[test]
  fn issue_and_validate_round_trip() {
    let user_id = Uuid::new_v4();
    let token = issue_token(SECRET, user_id, "jo@example.com", Role::Customer, 1).unwrap();

    let claims = validate_token(SECRET, &token).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.email, "jo@example.com");
    assert_eq!(claims.role, Role::Customer);
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn wrong_secret_is_rejected() {
    let token = issue_token(SECRET, Uuid::new_v4(), "jo@example.com", Role::Admin, 1).unwrap();
    let err = validate_token("another-secret-key-that-is-also-long", &token).unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
  }

  #[test]
  fn expired_token_is_rejected() {
    let token = issue_token(SECRET, Uuid::new_v4(), "jo@example.com", Role::Customer, -1).unwrap();
    let err = validate_token(SECRET, &token).unwrap_err();
    assert!(matches!(err, AppError::Auth(ref m) if m.contains("expired")));
  }

  #[test]
  fn garbage_token_is_rejected() {
    assert!(matches!(
      validate_token(SECRET, "not.a.token"),
      Err(AppError::Auth(_))
    ));
  }

  #[test]
  fn bearer_extraction() {
    assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    assert_eq!(extract_bearer("Basic abc"), None);
  }
}
