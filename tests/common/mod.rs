// Shared fixtures for the database-backed tests. Each #[sqlx::test] runs
// against its own freshly migrated database, so helpers only ever seed.
#![allow(dead_code)]

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use atelier_api::database::models::{Lead, LeadStatus, Tenant};
use atelier_api::services::{CreateLead, LeadService, TenantService, UpdateLead};

pub async fn seed_tenant(pool: &PgPool, slug: &str) -> Result<Tenant> {
    let tenant = TenantService::new(pool.clone())
        .create(&format!("Studio {}", slug), slug)
        .await?;
    Ok(tenant)
}

pub async fn seed_lead(
    pool: &PgPool,
    tenant_id: Uuid,
    name: &str,
    email: &str,
    status: LeadStatus,
) -> Result<Lead> {
    let lead = LeadService::new(pool.clone())
        .create(
            tenant_id,
            CreateLead {
                name: name.to_string(),
                email: email.to_string(),
                phone: Some("555-0100".to_string()),
                status: Some(status),
                assigned_user_id: None,
                source: Some("referral".to_string()),
                notes: None,
            },
        )
        .await?;
    Ok(lead)
}

/// Update payload that only moves the status into CONVERTED
pub fn convert() -> UpdateLead {
    UpdateLead { status: Some(LeadStatus::Converted), ..Default::default() }
}

pub async fn contact_count(pool: &PgPool, tenant_id: Uuid, email: &str) -> Result<i64> {
    let (n,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM contacts WHERE tenant_id = $1 AND email = $2")
            .bind(tenant_id)
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(n)
}

pub async fn conversion_count(pool: &PgPool, lead_id: Uuid) -> Result<i64> {
    let (n,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM lead_conversions WHERE lead_id = $1")
            .bind(lead_id)
            .fetch_one(pool)
            .await?;
    Ok(n)
}

pub async fn converted_contact_id(pool: &PgPool, lead_id: Uuid) -> Result<Uuid> {
    let (id,): (Uuid,) =
        sqlx::query_as("SELECT contact_id FROM lead_conversions WHERE lead_id = $1")
            .bind(lead_id)
            .fetch_one(pool)
            .await?;
    Ok(id)
}
