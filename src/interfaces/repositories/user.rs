use async_trait::async_trait;
use uuid::Uuid;
use std::borrow::Cow;

use crate::{
    entities::user::{AdminUser, AdminUserInsert, PasswordResetToken},
    errors::AppError,
    repositories::sqlx_repo::SqlxAdminUserRepo,
};

#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<AdminUser>, AppError>;
    async fn create_user(&self, user: &AdminUserInsert) -> Result<Uuid, AppError>;
    async fn create_reset_token(&self, token: &PasswordResetToken) -> Result<(), AppError>;
    async fn get_reset_token(&self, id: &Uuid) -> Result<Option<PasswordResetToken>, AppError>;
    /// Marks the token used and stores the new hash atomically. Returns
    /// `false` when the token was already used or has expired meanwhile.
    async fn complete_password_reset(&self, token_id: &Uuid, user_id: &Uuid, password_hash: &str) -> Result<bool, AppError>;
    async fn purge_stale_reset_tokens(&self) -> Result<u64, AppError>;
}

impl SqlxAdminUserRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxAdminUserRepo { pool }
    }
}

#[async_trait]
impl AdminUserRepository for SqlxAdminUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, AppError> {
        let user = sqlx::query_as::<_, AdminUser>(
            "SELECT * FROM admin_users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<AdminUser>, AppError> {
        sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create_user(&self, user: &AdminUserInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO admin_users (email, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict("Admin with this email already exists".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(id)
    }

    async fn create_reset_token(&self, token: &PasswordResetToken) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (id, user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_reset_token(&self, id: &Uuid) -> Result<Option<PasswordResetToken>, AppError> {
        let token = sqlx::query_as::<_, PasswordResetToken>(
            "SELECT * FROM password_reset_tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn complete_password_reset(&self, token_id: &Uuid, user_id: &Uuid, password_hash: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET used_at = NOW()
            WHERE id = $1 AND user_id = $2 AND used_at IS NULL AND expires_at > NOW()
            "#,
        )
        .bind(token_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE admin_users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn purge_stale_reset_tokens(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM password_reset_tokens WHERE expires_at < NOW() OR used_at IS NOT NULL",
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
