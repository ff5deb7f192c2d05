use std::sync::Arc;

use crate::{
    constants::RECENT_MESSAGES_LIMIT,
    entities::contact_message::DashboardSummary,
    errors::AppError,
    repositories::{contact_message::ContactMessageRepository, project::ProjectRepository},
};

/// Read-only aggregates for the dashboard landing page.
pub struct DashboardHandler {
    project_repo: Arc<dyn ProjectRepository>,
    contact_repo: Arc<dyn ContactMessageRepository>,
}

impl DashboardHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        contact_repo: Arc<dyn ContactMessageRepository>,
    ) -> Self {
        DashboardHandler { project_repo, contact_repo }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let (total_projects, featured_projects) = futures_util::try_join!(
            self.project_repo.count_projects(),
            self.project_repo.count_featured_projects(),
        )?;
        let (total_messages, unread_messages, recent_messages) = futures_util::try_join!(
            self.contact_repo.count_contact_messages(),
            self.contact_repo.count_unread_contact_messages(),
            self.contact_repo.recent_contact_messages(RECENT_MESSAGES_LIMIT),
        )?;

        Ok(DashboardSummary {
            total_projects,
            featured_projects,
            total_messages,
            unread_messages,
            recent_messages,
        })
    }
}
