use actix_web::web;
use tokio::time::{interval, Duration};

use crate::AppState;

const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(10 * 60);
/// Longest rate-limit window in use is an hour; idle keys past two are dead.
const LIMITER_IDLE: Duration = Duration::from_secs(2 * 60 * 60);

pub async fn start_maintenance_task(state: web::Data<AppState>) {
    let mut interval = interval(MAINTENANCE_INTERVAL);

    loop {
        interval.tick().await;
        run_maintenance(&state).await;
    }
}

pub async fn run_maintenance(state: &AppState) {
    match state.auth_handler.purge_expired().await {
        Ok((revoked, tokens)) => tracing::info!(
            "Purged {} revoked tokens and {} stale reset tokens", revoked, tokens
        ),
        Err(e) => tracing::error!("Token purge failed: {}", e),
    }

    let evicted = state.rate_limiter.evict_idle(LIMITER_IDLE);
    let expired = state.project_cache.purge_expired();
    tracing::debug!(evicted, expired, "Evicted idle limiter keys and expired cache entries");
}
