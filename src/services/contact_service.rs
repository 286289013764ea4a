use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Contact;
use crate::services::ServiceError;

pub struct ContactService {
    pool: PgPool,
}

impl ContactService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, tenant_id: Uuid, contact_id: Uuid) -> Result<Contact, ServiceError> {
        sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1 AND tenant_id = $2")
            .bind(contact_id)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("contact not found: {}", contact_id)))
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Contact>, ServiceError> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE tenant_id = $1 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }
}
