use actix_web::{get, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, use_cases::extractors::AdminClaims, AppState};

#[get("/summary")]
#[instrument(skip(_claims, state))]
pub async fn summary(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let summary = state.dashboard_handler.summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}
