use std::{sync::Arc, time::Duration};

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, password, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, cache, db, limiter, utils};

use auth::jwt::JwtService;
use cache::project_cache::ProjectListCache;
use limiter::rate_limiter::RateLimiterStore;
use repositories::{
    contact_message::ContactMessageRepository,
    project::ProjectRepository,
    sqlx_repo::{SqlxAdminUserRepo, SqlxContactMessageRepo, SqlxProjectRepo},
    user::AdminUserRepository,
};
use settings::AppConfig;
use use_cases::{
    auth::{AuthHandler, ResetPolicy},
    contact::{ContactLimits, ContactMessageHandler},
    dashboard::DashboardHandler,
    projects::ProjectHandler,
    reset_notifier::{LogResetNotifier, ResetNotifier},
};

/// Storage backends behind the use cases.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn AdminUserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub messages: Arc<dyn ContactMessageRepository>,
}

impl Repositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Repositories {
            users: Arc::new(SqlxAdminUserRepo::new(pool.clone())),
            projects: Arc::new(SqlxProjectRepo::new(pool.clone())),
            messages: Arc::new(SqlxContactMessageRepo::new(pool)),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub project_handler: ProjectHandler,
    pub contact_handler: ContactMessageHandler,
    pub dashboard_handler: DashboardHandler,
    pub auth_handler: AuthHandler,
    pub rate_limiter: RateLimiterStore,
    pub project_cache: ProjectListCache,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Self {
        Self::with_repositories(config, Repositories::postgres(pool), Arc::new(LogResetNotifier))
    }

    pub fn with_repositories(
        config: &AppConfig,
        repos: Repositories,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Self {
        let rate_limiter = RateLimiterStore::new();
        let project_cache = ProjectListCache::new(Duration::from_secs(config.project_cache_ttl_secs));

        let project_handler = ProjectHandler::new(repos.projects.clone(), project_cache.clone());
        let contact_handler = ContactMessageHandler::new(
            repos.messages.clone(),
            rate_limiter.clone(),
            ContactLimits {
                per_email: config.contact_limit_per_email,
                per_ip: config.contact_limit_per_ip,
            },
        );
        let dashboard_handler = DashboardHandler::new(repos.projects, repos.messages);
        let auth_handler = AuthHandler::new(
            repos.users,
            JwtService::new(config),
            notifier,
            rate_limiter.clone(),
            config.login_limit_per_minute,
            ResetPolicy {
                link_base: config.password_reset_url.clone(),
                ttl: chrono::Duration::minutes(config.password_reset_ttl_minutes),
            },
        );

        AppState {
            config: config.clone(),
            project_handler,
            contact_handler,
            dashboard_handler,
            auth_handler,
            rate_limiter,
            project_cache,
        }
    }
}
