use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;

use super::{parse_uuid, require};
use crate::error::ApiError;
use crate::guard;
use crate::middleware::AuthUser;
use crate::services::ContactService;
use crate::state::AppState;

use super::leads::TenantQuery;

/// GET /api/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<TenantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", query.tenant_id)?)?;

    guard::authorize(&state.pool, &caller, tenant_id, None).await?;

    let contacts = ContactService::new(state.pool.clone()).list(tenant_id).await?;

    Ok(Json(json!({ "success": true, "data": contacts })))
}

/// GET /api/contacts/:id
pub async fn get_contact(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<TenantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let contact_id = parse_uuid("contact_id", &id)?;
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", query.tenant_id)?)?;

    guard::authorize(&state.pool, &caller, tenant_id, None).await?;

    let contact = ContactService::new(state.pool.clone()).get(tenant_id, contact_id).await?;

    Ok(Json(json!({ "success": true, "data": contact })))
}
