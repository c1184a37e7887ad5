// src/web/extractors.rs

//! Request extractors for authenticated identity.
//!
//! `AuthenticatedUser` decodes the Bearer token against the configured
//! secret; `AdminUser` additionally gates on role. Missing or bad tokens are
//! 401, an insufficient role is 403.

use actix_web::{http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Role;
use crate::services::token_service;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub email: String,
  pub role: Role,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured".to_string()))?;

  let header_value = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|h| h.to_str().ok())
    .ok_or_else(|| AppError::Auth("Access token required".to_string()))?;

  let token =
    token_service::extract_bearer(header_value).ok_or_else(|| AppError::Auth("Access token required".to_string()))?;

  let claims = token_service::validate_token(&state.config.jwt_secret, token).map_err(|e| {
    warn!(error = %e, "Rejected bearer token");
    e
  })?;

  Ok(AuthenticatedUser {
    user_id: claims.sub,
    email: claims.email,
    role: claims.role,
  })
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

/// An authenticated user that has passed the admin role gate.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    ready(authenticate(req).and_then(|user| {
      if user.role == Role::Admin {
        Ok(AdminUser(user))
      } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
      }
    }))
  }
}
