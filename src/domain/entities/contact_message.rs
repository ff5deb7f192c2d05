use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{entities::option_fields::OptionField, utils::sanitize::strip_markup};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewContactMessageForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Subject must be between 1 and 200 characters"))]
    pub subject: String,

    #[validate(length(min = 5, max = 5000, message = "Message must be between 5 and 5000 characters"))]
    pub message: String,
}

/// Normalised submission as stored. Lengths are checked again here because
/// stripping markup can leave a field empty.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ContactMessageInsert {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Subject must be between 1 and 200 characters"))]
    pub subject: String,

    #[validate(length(min = 5, max = 5000, message = "Message must be between 5 and 5000 characters"))]
    pub message: String,
}

impl From<NewContactMessageForm> for ContactMessageInsert {
    fn from(form: NewContactMessageForm) -> Self {
        ContactMessageInsert {
            name: clean_text(&form.name),
            email: form.email.trim().to_lowercase(),
            subject: clean_text(&form.subject),
            message: clean_text(&form.message),
        }
    }
}

fn clean_text(raw: &str) -> String {
    strip_markup(raw).trim().to_string()
}

/// Admin edit of a stored message. `null` is not meaningful for these
/// columns, so only absent/value are honoured.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateContactMessageRequest {
    #[validate(custom(function = "validate_patch_name"))]
    pub name: OptionField<String>,

    #[validate(custom(function = "validate_patch_email"))]
    pub email: OptionField<String>,

    #[validate(custom(function = "validate_patch_subject"))]
    pub subject: OptionField<String>,

    #[validate(custom(function = "validate_patch_message"))]
    pub message: OptionField<String>,

    pub is_read: OptionField<bool>,
}

impl UpdateContactMessageRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_unchanged()
            && self.email.is_unchanged()
            && self.subject.is_unchanged()
            && self.message.is_unchanged()
            && self.is_read.is_unchanged()
    }

    /// Strips markup and whitespace from the text fields. Validate the
    /// result, not the raw request.
    pub fn normalized(self) -> Self {
        UpdateContactMessageRequest {
            name: self.name.map_value(|v| clean_text(&v)),
            email: self.email.map_value(|v| v.trim().to_lowercase()),
            subject: self.subject.map_value(|v| clean_text(&v)),
            message: self.message.map_value(|v| clean_text(&v)),
            is_read: self.is_read,
        }
    }

    pub fn apply(self, current: &ContactMessage) -> ContactMessage {
        ContactMessage {
            id: current.id,
            name: self.name
                .apply_to(Some(current.name.clone()))
                .unwrap_or_else(|| current.name.clone()),
            email: self.email
                .apply_to(Some(current.email.clone()))
                .unwrap_or_else(|| current.email.clone()),
            subject: self.subject
                .apply_to(Some(current.subject.clone()))
                .unwrap_or_else(|| current.subject.clone()),
            message: self.message
                .apply_to(Some(current.message.clone()))
                .unwrap_or_else(|| current.message.clone()),
            created_at: current.created_at,
            is_read: self.is_read.apply_to(Some(current.is_read)).unwrap_or(current.is_read),
        }
    }
}

fn check_patch_len(value: &OptionField<String>, min: usize, max: usize, msg: &'static str) -> Result<(), validator::ValidationError> {
    match value {
        OptionField::SetToValue(v) if (min..=max).contains(&v.trim().chars().count()) => Ok(()),
        OptionField::Unchanged => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("length");
            err.message = Some(msg.into());
            Err(err)
        }
    }
}

fn validate_patch_name(value: &OptionField<String>) -> Result<(), validator::ValidationError> {
    check_patch_len(value, 2, 100, "Name must be between 2 and 100 characters")
}

fn validate_patch_subject(value: &OptionField<String>) -> Result<(), validator::ValidationError> {
    check_patch_len(value, 1, 200, "Subject must be between 1 and 200 characters")
}

fn validate_patch_message(value: &OptionField<String>) -> Result<(), validator::ValidationError> {
    check_patch_len(value, 5, 5000, "Message must be between 5 and 5000 characters")
}

fn validate_patch_email(value: &OptionField<String>) -> Result<(), validator::ValidationError> {
    use validator::ValidateEmail;

    match value {
        OptionField::Unchanged => Ok(()),
        OptionField::SetToValue(v) if v.trim().to_string().validate_email() => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("email");
            err.message = Some("Invalid email format".into());
            Err(err)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactMessageFilter {
    pub search: Option<String>,
    #[serde(default)]
    pub unread_only: bool,
}

impl ContactMessageFilter {
    pub fn normalized(self) -> Self {
        ContactMessageFilter {
            search: self.search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            unread_only: self.unread_only,
        }
    }

    /// Mirrors the repository predicate: case-insensitive substring match on
    /// name, email or subject.
    pub fn matches(&self, msg: &ContactMessage) -> bool {
        if self.unread_only && msg.is_read {
            return false;
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                [&msg.name, &msg.email, &msg.subject]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactMessageResponse {
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactMessageListResponse {
    pub messages: Vec<ContactMessage>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_projects: i64,
    pub featured_projects: i64,
    pub total_messages: i64,
    pub unread_messages: i64,
    pub recent_messages: Vec<ContactMessage>,
}
