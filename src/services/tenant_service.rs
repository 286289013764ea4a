use sqlx::PgPool;

use crate::database::models::Tenant;
use crate::services::ServiceError;

pub struct TenantService {
    pool: PgPool,
}

impl TenantService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new tenant. The slug is the login-time identifier clients
    /// use to name their organization.
    pub async fn create(&self, name: &str, slug: &str) -> Result<Tenant, ServiceError> {
        validate_slug(slug)?;

        if self.find_by_slug(slug).await?.is_some() {
            return Err(ServiceError::InvalidArgument(format!(
                "Tenant already exists: {}",
                slug
            )));
        }

        let tenant = sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (name, slug) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(tenant)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, ServiceError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tenant)
    }
}

fn validate_slug(slug: &str) -> Result<(), ServiceError> {
    if slug.len() < 2 {
        return Err(ServiceError::InvalidArgument(
            "Tenant slug must be at least 2 characters".to_string(),
        ));
    }

    if slug.len() > 100 {
        return Err(ServiceError::InvalidArgument(
            "Tenant slug must be less than 100 characters".to_string(),
        ));
    }

    // Only allow alphanumeric, hyphens, and underscores
    if !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ServiceError::InvalidArgument(
            "Tenant slug can only contain letters, numbers, hyphens, and underscores".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_slugs() {
        assert!(validate_slug("studio-nord").is_ok());
        assert!(validate_slug("t1").is_ok());
        assert!(validate_slug("a").is_err());
        assert!(validate_slug("bad slug").is_err());
        assert!(validate_slug("sémaphore").is_err());
    }
}
