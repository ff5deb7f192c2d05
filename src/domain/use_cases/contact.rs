use std::{sync::Arc, time::Duration};

use validator::Validate;

use crate::{
    entities::contact_message::{
        ContactMessage, ContactMessageFilter, ContactMessageInsert, ContactMessageListResponse,
        ContactMessageResponse, NewContactMessageForm, UnreadCountResponse,
        UpdateContactMessageRequest,
    },
    errors::AppError,
    limiter::rate_limiter::RateLimiterStore,
    repositories::contact_message::ContactMessageRepository,
    utils::valid_uuid::valid_uuid,
};

const SUBMISSION_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Per-hour submission allowances for the public contact form.
#[derive(Debug, Clone, Copy)]
pub struct ContactLimits {
    pub per_email: u64,
    pub per_ip: u64,
}

pub struct ContactMessageHandler {
    pub contact_repo: Arc<dyn ContactMessageRepository>,
    limiter: RateLimiterStore,
    limits: ContactLimits,
}

impl ContactMessageHandler {
    pub fn new(
        contact_repo: Arc<dyn ContactMessageRepository>,
        limiter: RateLimiterStore,
        limits: ContactLimits,
    ) -> Self {
        ContactMessageHandler { contact_repo, limiter, limits }
    }

    /// Stores a message from the public form. Only well-formed submissions
    /// count against the limits.
    pub async fn submit_contact_message(
        &self,
        request: NewContactMessageForm,
        client_ip: &str,
    ) -> Result<ContactMessageResponse, AppError> {
        request.validate()?;

        let new_msg = ContactMessageInsert::from(request);
        new_msg.validate()?;

        self.limiter
            .check(&format!("contact:ip:{}", client_ip), self.limits.per_ip, SUBMISSION_WINDOW)
            .map_err(AppError::RateLimited)?;
        self.limiter
            .check(
                &format!("contact:email:{}", urlencoding::encode(&new_msg.email)),
                self.limits.per_email,
                SUBMISSION_WINDOW,
            )
            .map_err(AppError::RateLimited)?;

        let created = self.contact_repo.create_contact_message(&new_msg).await?;
        tracing::info!(message_id = %created.id, "Contact message received");

        Ok(ContactMessageResponse {
            message: "Your message has been received.".to_string(),
            id: created.id,
        })
    }

    pub async fn list_contact_messages(
        &self,
        filter: ContactMessageFilter,
    ) -> Result<ContactMessageListResponse, AppError> {
        let messages = self.contact_repo.list_contact_messages(&filter.normalized()).await?;

        Ok(ContactMessageListResponse {
            total: messages.len(),
            messages,
        })
    }

    pub async fn unread_count(&self) -> Result<UnreadCountResponse, AppError> {
        let count = self.contact_repo.count_unread_contact_messages().await?;
        Ok(UnreadCountResponse { count })
    }

    pub async fn get_contact_message(&self, id: &str) -> Result<ContactMessage, AppError> {
        let valid_id = valid_uuid(id)?;

        self.contact_repo.get_contact_message_by_id(&valid_id).await
    }

    pub async fn update_contact_message(
        &self,
        id: &str,
        request: UpdateContactMessageRequest,
    ) -> Result<ContactMessage, AppError> {
        let request = request.normalized();
        request.validate()?;
        if request.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let valid_id = valid_uuid(id)?;
        let current = self.contact_repo.get_contact_message_by_id(&valid_id).await?;

        self.contact_repo
            .update_contact_message(&request.apply(&current))
            .await
    }

    pub async fn toggle_read_status(&self, id: &str) -> Result<ContactMessage, AppError> {
        let valid_id = valid_uuid(id)?;

        self.contact_repo.toggle_read_status(&valid_id).await
    }

    pub async fn delete_contact_message(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;

        self.contact_repo.delete_contact_message(&valid_id).await
    }
}
