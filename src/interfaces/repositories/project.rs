use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder, Postgres};
use uuid::Uuid;

use crate::{
    constants::FEATURED_TAG,
    entities::project::{Project, ProjectChanges, ProjectFilter, ProjectInsert},
    errors::AppError,
    repositories::sqlx_repo::{like_pattern, SqlxProjectRepo},
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError>;
    async fn list_tags(&self) -> Result<Vec<String>, AppError>;
    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    async fn count_projects(&self) -> Result<i64, AppError>;
    async fn count_featured_projects(&self) -> Result<i64, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProjectFilter) {
    builder.push(" WHERE TRUE");

    if let Some(tag) = &filter.tag {
        builder.push(" AND ").push_bind(tag.clone()).push(" = ANY(tags)");
    }
    if filter.featured {
        builder
            .push(" AND (featured OR ")
            .push_bind(FEATURED_TAG)
            .push(" = ANY(tags))");
    }
    if let Some(search) = &filter.search {
        builder.push(" AND title ILIKE ").push_bind(like_pattern(search));
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let created = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                title, description, tech_stack, image_url, project_url,
                github_repo_url, tags, featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.tech_stack)
        .bind(&project.image_url)
        .bind(&project.project_url)
        .bind(&project.github_repo_url)
        .bind(&project.tags)
        .bind(project.featured)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM projects");
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");

        let projects = builder
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    async fn list_tags(&self) -> Result<Vec<String>, AppError> {
        let tags: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT tag
            FROM projects, UNNEST(tags) AS tag
            ORDER BY tag
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                title = $1,
                description = $2,
                tech_stack = $3,
                image_url = $4,
                project_url = $5,
                github_repo_url = $6,
                tags = $7,
                featured = $8,
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.tech_stack)
        .bind(&changes.image_url)
        .bind(&changes.project_url)
        .bind(&changes.github_repo_url)
        .bind(&changes.tags)
        .bind(changes.featured)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }

        Ok(())
    }

    async fn count_projects(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_featured_projects(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects WHERE featured OR $1 = ANY(tags)",
        )
        .bind(FEATURED_TAG)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
