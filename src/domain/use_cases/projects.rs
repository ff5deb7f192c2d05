use std::sync::Arc;

use validator::Validate;

use crate::{
    cache::project_cache::ProjectListCache,
    entities::project::{
        NewProjectRequest, Project, ProjectFilter, ProjectInsert, ProjectListResponse,
        TagListResponse, UpdateProjectRequest,
    },
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
    cache: ProjectListCache,
}

impl ProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>, cache: ProjectListCache) -> Self {
        ProjectHandler { project_repo, cache }
    }

    /// Public listing, served from the cache when possible.
    pub async fn list_projects(&self, filter: ProjectFilter) -> Result<ProjectListResponse, AppError> {
        let filter = filter.normalized();

        let projects = match self.cache.get(&filter) {
            Some(cached) => cached,
            None => {
                let generation = self.cache.generation();
                let fresh = self.project_repo.list_projects(&filter).await?;
                self.cache.insert(filter, fresh, generation)
            }
        };

        Ok(ProjectListResponse {
            total: projects.len(),
            projects: projects.as_ref().clone(),
        })
    }

    /// Dashboard listing; always reads through to the repository.
    pub async fn admin_list_projects(&self, filter: ProjectFilter) -> Result<ProjectListResponse, AppError> {
        let projects = self.project_repo.list_projects(&filter.normalized()).await?;

        Ok(ProjectListResponse {
            total: projects.len(),
            projects,
        })
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;

        self.project_repo.get_project_by_id(&valid_id).await
    }

    pub async fn list_tags(&self) -> Result<TagListResponse, AppError> {
        let tags = self.project_repo.list_tags().await?;
        Ok(TagListResponse { tags })
    }

    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        request.validate()?;

        let insert = ProjectInsert::from(request);
        let project = self.project_repo.create_project(&insert).await?;
        self.cache.invalidate();

        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn update_project(&self, id: &str, request: UpdateProjectRequest) -> Result<Project, AppError> {
        request.validate()?;
        if request.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let valid_id = valid_uuid(id)?;
        let current = self.project_repo.get_project_by_id(&valid_id).await?;

        let changes = request.apply(&current);
        let updated = self.project_repo.update_project(&valid_id, &changes).await?;
        self.cache.invalidate();

        Ok(updated)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;

        self.project_repo.delete_project(&valid_id).await?;
        self.cache.invalidate();

        tracing::info!(project_id = %valid_id, "Project deleted");
        Ok(())
    }
}
