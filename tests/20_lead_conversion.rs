mod common;

use anyhow::Result;
use sqlx::PgPool;

use atelier_api::database::models::LeadStatus;
use atelier_api::services::{LeadService, UpdateLead};

#[sqlx::test]
async fn converting_a_lead_creates_contact_and_conversion(pool: PgPool) -> Result<()> {
    let tenant = common::seed_tenant(&pool, "studio-a").await?;
    let lead =
        common::seed_lead(&pool, tenant.id, "A", "a@x.com", LeadStatus::Qualified).await?;

    let updated = LeadService::new(pool.clone())
        .update(tenant.id, lead.id, common::convert())
        .await?;

    assert_eq!(updated.status, LeadStatus::Converted);
    assert_eq!(common::contact_count(&pool, tenant.id, "a@x.com").await?, 1);
    assert_eq!(common::conversion_count(&pool, lead.id).await?, 1);

    // the conversion points at the tenant's contact for the lead's email
    let contact_id = common::converted_contact_id(&pool, lead.id).await?;
    let (email, name): (String, String) =
        sqlx::query_as("SELECT email, name FROM contacts WHERE id = $1")
            .bind(contact_id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(email, "a@x.com");
    assert_eq!(name, "A");

    Ok(())
}

#[sqlx::test]
async fn repeating_the_converting_update_is_idempotent(pool: PgPool) -> Result<()> {
    let tenant = common::seed_tenant(&pool, "studio-b").await?;
    let lead =
        common::seed_lead(&pool, tenant.id, "B", "b@x.com", LeadStatus::Negotiation).await?;

    let svc = LeadService::new(pool.clone());
    svc.update(tenant.id, lead.id, common::convert()).await?;
    // identical second call: previous status is already CONVERTED
    svc.update(tenant.id, lead.id, common::convert()).await?;

    assert_eq!(common::contact_count(&pool, tenant.id, "b@x.com").await?, 1);
    assert_eq!(common::conversion_count(&pool, lead.id).await?, 1);

    Ok(())
}

#[sqlx::test]
async fn later_edits_of_a_converted_lead_never_reconvert(pool: PgPool) -> Result<()> {
    let tenant = common::seed_tenant(&pool, "studio-c").await?;
    let lead = common::seed_lead(&pool, tenant.id, "C", "c@x.com", LeadStatus::New).await?;

    let svc = LeadService::new(pool.clone());
    svc.update(tenant.id, lead.id, common::convert()).await?;

    // edit the email and re-save status CONVERTED: no contact for the new
    // address, no second conversion row
    svc.update(
        tenant.id,
        lead.id,
        UpdateLead {
            email: Some("c-new@x.com".to_string()),
            status: Some(LeadStatus::Converted),
            ..Default::default()
        },
    )
    .await?;

    assert_eq!(common::contact_count(&pool, tenant.id, "c@x.com").await?, 1);
    assert_eq!(common::contact_count(&pool, tenant.id, "c-new@x.com").await?, 0);
    assert_eq!(common::conversion_count(&pool, lead.id).await?, 1);

    Ok(())
}

#[sqlx::test]
async fn updates_that_do_not_enter_converted_create_nothing(pool: PgPool) -> Result<()> {
    let tenant = common::seed_tenant(&pool, "studio-d").await?;
    let lead = common::seed_lead(&pool, tenant.id, "D", "d@x.com", LeadStatus::New).await?;

    let svc = LeadService::new(pool.clone());

    // no status field at all
    svc.update(
        tenant.id,
        lead.id,
        UpdateLead { notes: Some("met at the showroom".to_string()), ..Default::default() },
    )
    .await?;

    // status present but unchanged
    svc.update(
        tenant.id,
        lead.id,
        UpdateLead { status: Some(LeadStatus::New), ..Default::default() },
    )
    .await?;

    // intermediate transitions
    svc.update(
        tenant.id,
        lead.id,
        UpdateLead { status: Some(LeadStatus::Qualified), ..Default::default() },
    )
    .await?;

    assert_eq!(common::contact_count(&pool, tenant.id, "d@x.com").await?, 0);
    assert_eq!(common::conversion_count(&pool, lead.id).await?, 0);

    Ok(())
}

#[sqlx::test]
async fn contact_is_reused_across_leads_sharing_an_email(pool: PgPool) -> Result<()> {
    let tenant = common::seed_tenant(&pool, "studio-e").await?;
    let first =
        common::seed_lead(&pool, tenant.id, "E1", "shared@x.com", LeadStatus::Qualified).await?;
    let second =
        common::seed_lead(&pool, tenant.id, "E2", "shared@x.com", LeadStatus::Contacted).await?;

    let svc = LeadService::new(pool.clone());
    svc.update(tenant.id, first.id, common::convert()).await?;
    svc.update(tenant.id, second.id, common::convert()).await?;

    assert_eq!(common::contact_count(&pool, tenant.id, "shared@x.com").await?, 1);
    assert_eq!(common::conversion_count(&pool, first.id).await?, 1);
    assert_eq!(common::conversion_count(&pool, second.id).await?, 1);
    assert_eq!(
        common::converted_contact_id(&pool, first.id).await?,
        common::converted_contact_id(&pool, second.id).await?
    );

    Ok(())
}

#[sqlx::test]
async fn contacts_are_not_shared_between_tenants(pool: PgPool) -> Result<()> {
    let left = common::seed_tenant(&pool, "studio-left").await?;
    let right = common::seed_tenant(&pool, "studio-right").await?;
    let lead_left =
        common::seed_lead(&pool, left.id, "L", "twin@x.com", LeadStatus::Qualified).await?;
    let lead_right =
        common::seed_lead(&pool, right.id, "R", "twin@x.com", LeadStatus::Qualified).await?;

    let svc = LeadService::new(pool.clone());
    svc.update(left.id, lead_left.id, common::convert()).await?;
    svc.update(right.id, lead_right.id, common::convert()).await?;

    // same email, different tenants: one contact each
    assert_eq!(common::contact_count(&pool, left.id, "twin@x.com").await?, 1);
    assert_eq!(common::contact_count(&pool, right.id, "twin@x.com").await?, 1);
    assert_ne!(
        common::converted_contact_id(&pool, lead_left.id).await?,
        common::converted_contact_id(&pool, lead_right.id).await?
    );

    Ok(())
}

#[sqlx::test]
async fn preexisting_conversion_row_makes_the_insert_a_noop(pool: PgPool) -> Result<()> {
    let tenant = common::seed_tenant(&pool, "studio-f").await?;
    let lead = common::seed_lead(&pool, tenant.id, "F", "f@x.com", LeadStatus::Qualified).await?;

    // simulate a concurrent converter that already recorded the conversion
    let (contact_id,): (uuid::Uuid,) = sqlx::query_as(
        "INSERT INTO contacts (tenant_id, name, email) VALUES ($1, 'F', 'f@x.com') RETURNING id",
    )
    .bind(tenant.id)
    .fetch_one(&pool)
    .await?;
    sqlx::query("INSERT INTO lead_conversions (tenant_id, lead_id, contact_id) VALUES ($1, $2, $3)")
        .bind(tenant.id)
        .bind(lead.id)
        .bind(contact_id)
        .execute(&pool)
        .await?;

    // the update still succeeds; the duplicate insert is treated as
    // "already converted" rather than an error
    let updated = LeadService::new(pool.clone())
        .update(tenant.id, lead.id, common::convert())
        .await?;

    assert_eq!(updated.status, LeadStatus::Converted);
    assert_eq!(common::conversion_count(&pool, lead.id).await?, 1);
    assert_eq!(common::contact_count(&pool, tenant.id, "f@x.com").await?, 1);

    Ok(())
}
