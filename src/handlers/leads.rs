use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{parse_status, parse_uuid, require};
use crate::error::ApiError;
use crate::guard;
use crate::middleware::AuthUser;
use crate::services::{CreateLead, LeadFilters, LeadService, UpdateLead};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub tenant_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub assigned_user_id: Option<Uuid>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

/// POST /api/leads
pub async fn create_lead(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(body): Json<CreateLeadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", body.tenant_id)?)?;
    let name = require("name", body.name)?;
    let email = require("email", body.email)?;
    let status = parse_status("status", body.status.as_deref())?;

    guard::authorize(&state.pool, &caller, tenant_id, None).await?;

    let lead = LeadService::new(state.pool.clone())
        .create(
            tenant_id,
            CreateLead {
                name,
                email,
                phone: body.phone,
                status,
                assigned_user_id: body.assigned_user_id,
                source: body.source,
                notes: body.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": lead }))))
}

#[derive(Debug, Deserialize)]
pub struct ListLeadsQuery {
    pub tenant_id: Option<String>,
    pub status: Option<String>,
    pub assigned_user_id: Option<Uuid>,
}

/// GET /api/leads
pub async fn list_leads(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<ListLeadsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", query.tenant_id)?)?;
    let status = parse_status("status", query.status.as_deref())?;

    guard::authorize(&state.pool, &caller, tenant_id, None).await?;

    let leads = LeadService::new(state.pool.clone())
        .list(tenant_id, LeadFilters { status, assigned_user_id: query.assigned_user_id })
        .await?;

    Ok(Json(json!({ "success": true, "data": leads })))
}

#[derive(Debug, Deserialize)]
pub struct TenantQuery {
    pub tenant_id: Option<String>,
}

/// GET /api/leads/:id
pub async fn get_lead(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<TenantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let lead_id = parse_uuid("lead_id", &id)?;
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", query.tenant_id)?)?;

    guard::authorize(&state.pool, &caller, tenant_id, None).await?;

    let lead = LeadService::new(state.pool.clone()).get(tenant_id, lead_id).await?;

    Ok(Json(json!({ "success": true, "data": lead })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    pub tenant_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub assigned_user_id: Option<Uuid>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

/// PATCH /api/leads/:id - partial update; transitioning the status into
/// CONVERTED runs the conversion workflow as a side effect
pub async fn update_lead(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateLeadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let lead_id = parse_uuid("lead_id", &id)?;
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", body.tenant_id)?)?;
    let status = parse_status("status", body.status.as_deref())?;

    guard::authorize(&state.pool, &caller, tenant_id, None).await?;

    let lead = LeadService::new(state.pool.clone())
        .update(
            tenant_id,
            lead_id,
            UpdateLead {
                name: body.name,
                email: body.email,
                phone: body.phone,
                status,
                assigned_user_id: body.assigned_user_id,
                source: body.source,
                notes: body.notes,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": lead })))
}

/// DELETE /api/leads/:id - removes the lead and its conversion records
pub async fn delete_lead(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<TenantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let lead_id = parse_uuid("lead_id", &id)?;
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", query.tenant_id)?)?;

    guard::authorize(&state.pool, &caller, tenant_id, None).await?;

    LeadService::new(state.pool.clone()).delete(tenant_id, lead_id).await?;

    Ok(Json(json!({ "success": true, "lead_id": lead_id })))
}
