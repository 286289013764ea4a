use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use super::require;
use crate::auth::{generate_jwt, verify_password, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{TenantService, UserService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub tenant: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login - authenticate and receive a JWT.
///
/// Unknown tenant, unknown user and wrong password are deliberately
/// indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant_slug = require("tenant", body.tenant)?;
    let email = require("email", body.email)?;
    let password = require("password", body.password)?;

    let tenant = TenantService::new(state.pool.clone())
        .find_by_slug(&tenant_slug)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Invalid credentials"))?;

    let user = UserService::new(state.pool.clone())
        .find_active_by_email(tenant.id, &email)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Invalid credentials"))?;

    if !verify_password(&password, &user.password_hash) {
        tracing::warn!(tenant = %tenant.slug, "failed login attempt");
        return Err(ApiError::unauthenticated("Invalid credentials"));
    }

    let claims = Claims::new(user.id, user.email.clone(), user.tenant_id, user.role);
    let token = generate_jwt(&claims).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal("Failed to issue access token")
    })?;

    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": {
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "tenant_id": user.tenant_id,
                "role": user.role,
            },
            "expires_in": expires_in,
        }
    })))
}

/// GET /api/auth/whoami - fresh record for the authenticated caller
pub async fn whoami(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = UserService::new(state.pool.clone())
        .find_by_id(caller.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user not found: {}", caller.user_id)))?;

    Ok(Json(json!({ "success": true, "data": user })))
}
