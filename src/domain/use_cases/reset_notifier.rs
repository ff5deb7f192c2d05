use async_trait::async_trait;

use crate::errors::AppError;

/// Delivers a password reset link to an admin.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send_reset_link(&self, email: &str, link: &str) -> Result<(), AppError>;
}

/// Writes the link to the log. Operators copy it from there until a mail
/// transport is wired in.
#[derive(Debug, Default, Clone)]
pub struct LogResetNotifier;

#[async_trait]
impl ResetNotifier for LogResetNotifier {
    async fn send_reset_link(&self, email: &str, link: &str) -> Result<(), AppError> {
        tracing::info!(%email, %link, "Password reset requested");
        Ok(())
    }
}
