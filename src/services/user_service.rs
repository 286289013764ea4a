use sqlx::PgPool;
use uuid::Uuid;

use crate::auth;
use crate::database::models::{User, UserRole};
use crate::services::ServiceError;

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Unscoped lookup of the caller's own record (whoami, guard fallback)
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get(&self, tenant_id: Uuid, user_id: Uuid) -> Result<User, ServiceError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND tenant_id = $2")
            .bind(user_id)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user not found: {}", user_id)))
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<User>, ServiceError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE tenant_id = $1 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Login lookup: active users only
    pub async fn find_active_by_email(
        &self,
        tenant_id: Uuid,
        email: &str,
    ) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE tenant_id = $1 AND email = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, ServiceError> {
        if password.len() < 8 {
            return Err(ServiceError::InvalidArgument(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let password_hash = auth::hash_password(password)
            .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (tenant_id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
