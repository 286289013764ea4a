use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;

use super::leads::TenantQuery;
use super::{parse_uuid, require};
use crate::database::models::UserRole;
use crate::error::ApiError;
use crate::guard;
use crate::middleware::AuthUser;
use crate::services::UserService;
use crate::state::AppState;

/// GET /api/users - listing a tenant's users is restricted to ADMIN
pub async fn list_users(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<TenantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", query.tenant_id)?)?;

    guard::authorize(&state.pool, &caller, tenant_id, Some(&[UserRole::Admin])).await?;

    let users = UserService::new(state.pool.clone()).list(tenant_id).await?;

    Ok(Json(json!({ "success": true, "data": users })))
}

/// GET /api/users/:id - a caller may fetch their own record; ADMIN and
/// MANAGER may fetch any record in their tenant
pub async fn get_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<TenantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_uuid("user_id", &id)?;
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", query.tenant_id)?)?;

    let membership = guard::authorize(&state.pool, &caller, tenant_id, None).await?;

    let self_lookup = caller.user_id == user_id;
    let elevated = matches!(membership.role, UserRole::Admin | UserRole::Manager);
    if !self_lookup && !elevated {
        return Err(ApiError::permission_denied(
            "Caller may only fetch their own user record",
        ));
    }

    let user = UserService::new(state.pool.clone()).get(tenant_id, user_id).await?;

    Ok(Json(json!({ "success": true, "data": user })))
}
