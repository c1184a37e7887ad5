// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use validator::Validate;

use crate::errors::AppError;
use crate::models::User;
use crate::services::{auth_service, token_service};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestPayload {
  #[validate(email(message = "Valid email required"))]
  pub email: String,
  #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
  pub password: String,
  #[validate(length(min = 1, message = "First name required"))]
  pub first_name: String,
  #[validate(length(min = 1, message = "Last name required"))]
  pub last_name: String,
}

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestPayload {
  #[validate(email(message = "Valid email required"))]
  pub email: String,
  #[validate(length(min = 1, message = "Password required"))]
  pub password: String,
}

fn user_response(user: &User) -> serde_json::Value {
  json!({
    "id": user.id,
    "email": user.email,
    "firstName": user.first_name,
    "lastName": user.last_name,
    "role": user.role,
  })
}

// --- Handlers ---

#[instrument(name = "handler::register", skip(app_state, payload))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  payload.validate()?;

  let existing: Option<uuid::Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
    .bind(&payload.email)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if existing.is_some() {
    return Err(AppError::Validation("User already exists".to_string()));
  }

  let password_hash = auth_service::hash_password(&payload.password)?;

  let user = sqlx::query_as::<_, User>(
    "INSERT INTO users (email, password_hash, first_name, last_name) VALUES ($1, $2, $3, $4) \
     RETURNING id, email, password_hash, first_name, last_name, role, created_at, updated_at",
  )
  .bind(&payload.email)
  .bind(&password_hash)
  .bind(&payload.first_name)
  .bind(&payload.last_name)
  .fetch_one(&app_state.db_pool)
  .await?;

  let token = token_service::issue_token(
    &app_state.config.jwt_secret,
    user.id,
    &user.email,
    user.role(),
    app_state.config.token_ttl_hours,
  )?;

  info!(user_id = %user.id, "User registered");
  Ok(HttpResponse::Created().json(json!({
    "message": "User registered successfully",
    "token": token,
    "user": user_response(&user),
  })))
}

#[instrument(name = "handler::login", skip(app_state, payload))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  payload.validate()?;

  let user = sqlx::query_as::<_, User>(
    "SELECT id, email, password_hash, first_name, last_name, role, created_at, updated_at \
     FROM users WHERE email = $1",
  )
  .bind(&payload.email)
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

  // Same response for unknown email and wrong password.
  if !auth_service::verify_password(&user.password_hash, &payload.password)? {
    return Err(AppError::Auth("Invalid credentials".to_string()));
  }

  let token = token_service::issue_token(
    &app_state.config.jwt_secret,
    user.id,
    &user.email,
    user.role(),
    app_state.config.token_ttl_hours,
  )?;

  info!(user_id = %user.id, "User logged in");
  Ok(HttpResponse::Ok().json(json!({
    "message": "Login successful",
    "token": token,
    "user": user_response(&user),
  })))
}

#[instrument(name = "handler::profile", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn profile_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = sqlx::query_as::<_, User>(
    "SELECT id, email, password_hash, first_name, last_name, role, created_at, updated_at \
     FROM users WHERE id = $1",
  )
  .bind(auth_user.user_id)
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({
    "user": {
      "id": user.id,
      "email": user.email,
      "firstName": user.first_name,
      "lastName": user.last_name,
      "role": user.role,
      "createdAt": user.created_at,
    }
  })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn register_payload_validation_boundaries() {
    let ok = RegisterRequestPayload {
      email: "a@example.com".into(),
      password: "secret1".into(),
      first_name: "A".into(),
      last_name: "B".into(),
    };
    assert!(ok.validate().is_ok());

    let bad_email = RegisterRequestPayload { email: "nope".into(), ..destructure(&ok) };
    assert!(bad_email.validate().is_err());

    let short_password = RegisterRequestPayload { password: "12345".into(), ..destructure(&ok) };
    assert!(short_password.validate().is_err());

    let blank_name = RegisterRequestPayload { first_name: "".into(), ..destructure(&ok) };
    assert!(blank_name.validate().is_err());
  }

  fn destructure(p: &RegisterRequestPayload) -> RegisterRequestPayload {
    RegisterRequestPayload {
      email: p.email.clone(),
      password: p.password.clone(),
      first_name: p.first_name.clone(),
      last_name: p.last_name.clone(),
    }
  }
}
