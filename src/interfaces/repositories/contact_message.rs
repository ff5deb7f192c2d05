use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::contact_message::{ContactMessage, ContactMessageFilter, ContactMessageInsert},
    errors::AppError,
    repositories::sqlx_repo::{like_pattern, SqlxContactMessageRepo},
};

#[async_trait]
pub trait ContactMessageRepository: Send + Sync {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<ContactMessage, AppError>;
    async fn get_contact_message_by_id(&self, id: &Uuid) -> Result<ContactMessage, AppError>;
    async fn list_contact_messages(&self, filter: &ContactMessageFilter) -> Result<Vec<ContactMessage>, AppError>;
    async fn recent_contact_messages(&self, limit: i64) -> Result<Vec<ContactMessage>, AppError>;
    async fn count_contact_messages(&self) -> Result<i64, AppError>;
    async fn count_unread_contact_messages(&self) -> Result<i64, AppError>;
    async fn update_contact_message(&self, msg: &ContactMessage) -> Result<ContactMessage, AppError>;
    async fn toggle_read_status(&self, id: &Uuid) -> Result<ContactMessage, AppError>;
    async fn delete_contact_message(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxContactMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxContactMessageRepo { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Contact message not found".into())
}

#[async_trait]
impl ContactMessageRepository for SqlxContactMessageRepo {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<ContactMessage, AppError> {
        let created = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.subject)
        .bind(&msg.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_contact_message_by_id(&self, id: &Uuid) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>("SELECT * FROM contact_messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn list_contact_messages(&self, filter: &ContactMessageFilter) -> Result<Vec<ContactMessage>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM contact_messages WHERE TRUE");

        if filter.unread_only {
            builder.push(" AND is_read = FALSE");
        }
        if let Some(search) = &filter.search {
            let pattern = like_pattern(search);
            builder
                .push(" AND (name ILIKE ").push_bind(pattern.clone())
                .push(" OR email ILIKE ").push_bind(pattern.clone())
                .push(" OR subject ILIKE ").push_bind(pattern)
                .push(")");
        }
        builder.push(" ORDER BY created_at DESC");

        let messages = builder
            .build_query_as::<ContactMessage>()
            .fetch_all(&self.pool)
            .await?;

        Ok(messages)
    }

    async fn recent_contact_messages(&self, limit: i64) -> Result<Vec<ContactMessage>, AppError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT * FROM contact_messages ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn count_contact_messages(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_unread_contact_messages(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE is_read = FALSE")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update_contact_message(&self, msg: &ContactMessage) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages SET
                name = $1,
                email = $2,
                subject = $3,
                message = $4,
                is_read = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.subject)
        .bind(&msg.message)
        .bind(msg.is_read)
        .bind(msg.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn toggle_read_status(&self, id: &Uuid) -> Result<ContactMessage, AppError> {
        // Flipped in SQL; never read-modify-write.
        sqlx::query_as::<_, ContactMessage>(
            "UPDATE contact_messages SET is_read = NOT is_read WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn delete_contact_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        Ok(())
    }
}
