use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::database::models::{conversion_triggered, Lead, LeadStatus};
use crate::services::ServiceError;

/// Fields accepted when creating a lead
#[derive(Debug, Clone)]
pub struct CreateLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    pub assigned_user_id: Option<Uuid>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

/// Partial update: None leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateLead {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    pub assigned_user_id: Option<Uuid>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LeadFilters {
    pub status: Option<LeadStatus>,
    pub assigned_user_id: Option<Uuid>,
}

pub struct LeadService {
    pool: PgPool,
}

impl LeadService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, tenant_id: Uuid, input: CreateLead) -> Result<Lead, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("Lead name must not be empty".to_string()));
        }
        validate_email(&input.email)?;

        let status = input.status.unwrap_or(LeadStatus::New);

        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (tenant_id, name, email, phone, status, assigned_user_id, source, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(status)
        .bind(input.assigned_user_id)
        .bind(&input.source)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(lead)
    }

    /// Fetch a lead scoped to its tenant. A lead that exists under another
    /// tenant is indistinguishable from one that does not exist.
    pub async fn get(&self, tenant_id: Uuid, lead_id: Uuid) -> Result<Lead, ServiceError> {
        sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1 AND tenant_id = $2")
            .bind(lead_id)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("lead not found: {}", lead_id)))
    }

    pub async fn list(
        &self,
        tenant_id: Uuid,
        filters: LeadFilters,
    ) -> Result<Vec<Lead>, ServiceError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM leads WHERE tenant_id = ");
        query.push_bind(tenant_id);

        if let Some(status) = filters.status {
            query.push(" AND status = ");
            query.push_bind(status);
        }
        if let Some(assigned) = filters.assigned_user_id {
            query.push(" AND assigned_user_id = ");
            query.push_bind(assigned);
        }

        query.push(" ORDER BY created_at DESC");

        let leads = query.build_query_as::<Lead>().fetch_all(&self.pool).await?;
        Ok(leads)
    }

    /// Apply a partial update and run the conversion workflow when the
    /// status transitions from a non-CONVERTED value into CONVERTED.
    ///
    /// The whole operation is one transaction: the field update, the
    /// contact find-or-create, and the conversion insert commit together
    /// or not at all. The conversion row's unique lead_id constraint turns
    /// a concurrent double conversion into a no-op rather than a duplicate.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        lead_id: Uuid,
        changes: UpdateLead,
    ) -> Result<Lead, ServiceError> {
        if let Some(email) = &changes.email {
            validate_email(email)?;
        }
        if let Some(name) = &changes.name {
            if name.trim().is_empty() {
                return Err(ServiceError::InvalidArgument(
                    "Lead name must not be empty".to_string(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent updates of the same lead, so two
        // callers cannot both observe a pre-CONVERTED status.
        let existing = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
        .bind(lead_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("lead not found: {}", lead_id)))?;

        let updated = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                status = COALESCE($6, status),
                assigned_user_id = COALESCE($7, assigned_user_id),
                source = COALESCE($8, source),
                notes = COALESCE($9, notes),
                updated_at = now()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(tenant_id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(changes.status)
        .bind(changes.assigned_user_id)
        .bind(&changes.source)
        .bind(&changes.notes)
        .fetch_one(&mut *tx)
        .await?;

        if conversion_triggered(existing.status, updated.status) {
            let contact_id = resolve_contact(&mut tx, &updated).await?;

            let inserted = sqlx::query(
                r#"
                INSERT INTO lead_conversions (tenant_id, lead_id, contact_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (lead_id) DO NOTHING
                "#,
            )
            .bind(tenant_id)
            .bind(lead_id)
            .bind(contact_id)
            .execute(&mut *tx)
            .await?;

            if inserted.rows_affected() == 0 {
                tracing::debug!(lead_id = %lead_id, "lead already converted, conversion record kept");
            } else {
                tracing::info!(lead_id = %lead_id, contact_id = %contact_id, "lead converted");
            }
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a lead and its conversion records. The conversions go first:
    /// the store enforces a foreign key from lead_conversions to leads.
    pub async fn delete(&self, tenant_id: Uuid, lead_id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM leads WHERE id = $1 AND tenant_id = $2 FOR UPDATE")
                .bind(lead_id)
                .bind(tenant_id)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_none() {
            return Err(ServiceError::NotFound(format!("lead not found: {}", lead_id)));
        }

        sqlx::query("DELETE FROM lead_conversions WHERE lead_id = $1 AND tenant_id = $2")
            .bind(lead_id)
            .bind(tenant_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM leads WHERE id = $1 AND tenant_id = $2")
            .bind(lead_id)
            .bind(tenant_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(lead_id = %lead_id, "lead deleted");
        Ok(())
    }
}

/// Reuse the tenant's contact when one matches the lead's email, otherwise
/// create one copying name, email and phone from the lead.
async fn resolve_contact(
    tx: &mut Transaction<'_, Postgres>,
    lead: &Lead,
) -> Result<Uuid, ServiceError> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM contacts WHERE tenant_id = $1 AND email = $2 LIMIT 1")
            .bind(lead.tenant_id)
            .bind(&lead.email)
            .fetch_optional(&mut **tx)
            .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO contacts (tenant_id, name, email, phone) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(lead.tenant_id)
    .bind(&lead.name)
    .bind(&lead.email)
    .bind(&lead.phone)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

fn validate_email(email: &str) -> Result<(), ServiceError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ServiceError::InvalidArgument(format!("Invalid email format: {}", email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@studio.example.co").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@nodot").is_err());
    }
}
