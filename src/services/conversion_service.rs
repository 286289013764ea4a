use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::ConversionRecord;
use crate::services::ServiceError;

/// Hard cap on report size; requests never return more rows than this
pub const MAX_CONVERSION_ROWS: i64 = 100;

#[derive(Debug, Clone, Default)]
pub struct ConversionFilters {
    pub lead_id: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

pub struct ConversionService {
    pool: PgPool,
}

impl ConversionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Conversion report: tenant-scoped, most-recent-first, each row joined
    /// with its lead's and contact's identity.
    pub async fn list(
        &self,
        tenant_id: Uuid,
        filters: ConversionFilters,
    ) -> Result<Vec<ConversionRecord>, ServiceError> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT lc.id, lc.tenant_id, lc.lead_id, lc.contact_id, lc.converted_at,
                   l.name AS lead_name, l.email AS lead_email,
                   c.name AS contact_name, c.email AS contact_email
            FROM lead_conversions lc
            JOIN leads l ON l.id = lc.lead_id
            JOIN contacts c ON c.id = lc.contact_id
            WHERE lc.tenant_id = "#,
        );
        query.push_bind(tenant_id);

        if let Some(lead_id) = filters.lead_id {
            query.push(" AND lc.lead_id = ");
            query.push_bind(lead_id);
        }
        if let Some(contact_id) = filters.contact_id {
            query.push(" AND lc.contact_id = ");
            query.push_bind(contact_id);
        }
        if let Some(from) = filters.date_from {
            query.push(" AND lc.converted_at >= ");
            query.push_bind(from);
        }
        if let Some(to) = filters.date_to {
            query.push(" AND lc.converted_at <= ");
            query.push_bind(to);
        }

        query.push(" ORDER BY lc.converted_at DESC LIMIT ");
        query.push_bind(effective_limit(filters.limit));

        let rows = query
            .build_query_as::<ConversionRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

fn effective_limit(requested: Option<i64>) -> i64 {
    match requested {
        Some(n) if n > 0 => n.min(MAX_CONVERSION_ROWS),
        _ => MAX_CONVERSION_ROWS,
    }
}
