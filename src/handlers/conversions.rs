use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use super::{parse_timestamp, parse_uuid, require};
use crate::error::ApiError;
use crate::guard;
use crate::middleware::AuthUser;
use crate::services::{ConversionFilters, ConversionService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListConversionsQuery {
    pub tenant_id: Option<String>,
    pub lead_id: Option<String>,
    pub contact_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/conversions - conversion report, most-recent-first, capped at
/// 100 rows, each row carrying the linked lead's and contact's identity
pub async fn list_conversions(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<ListConversionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant_id = parse_uuid("tenant_id", &require("tenant_id", query.tenant_id)?)?;

    let filters = ConversionFilters {
        lead_id: query.lead_id.as_deref().map(|v| parse_uuid("lead_id", v)).transpose()?,
        contact_id: query.contact_id.as_deref().map(|v| parse_uuid("contact_id", v)).transpose()?,
        date_from: parse_timestamp("date_from", query.date_from.as_deref())?,
        date_to: parse_timestamp("date_to", query.date_to.as_deref())?,
        limit: query.limit,
    };

    guard::authorize(&state.pool, &caller, tenant_id, None).await?;

    let conversions = ConversionService::new(state.pool.clone()).list(tenant_id, filters).await?;

    Ok(Json(json!({ "success": true, "data": conversions })))
}
