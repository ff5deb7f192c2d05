use actix_web::{post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::token::RefreshTokenRequest;
use crate::entities::user::{ForgotPasswordRequest, LoginUser, LogoutRequest, ResetPasswordRequest};
use crate::errors::{AppError, AuthError};
use crate::use_cases::extractors::{AuthClaims, ClientIp};
use crate::AppState;

#[post("/login")]
#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn login(
    client_ip: ClientIp,
    state: web::Data<AppState>,
    user: web::Json<LoginUser>,
) -> Result<impl Responder, AuthError> {
    let response = state.auth_handler
        .login(user.into_inner(), &client_ip.0)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[post("/refresh")]
#[instrument(skip_all)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<impl Responder, AuthError> {
    let response = state.auth_handler
        .refresh_token(&request.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[post("/logout")]
#[instrument(skip_all, fields(user_id = %claims.0.sub))]
pub async fn logout(
    claims: AuthClaims,
    state: web::Data<AppState>,
    body: web::Json<LogoutRequest>,
) -> Result<impl Responder, AuthError> {
    state.auth_handler.logout(&claims.0, &body.refresh_token)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Logged out successfully"})))
}

#[post("/forgot-password")]
#[instrument(skip_all)]
pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> Result<impl Responder, AppError> {
    state.auth_handler.forgot_password(body.into_inner()).await?;

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "message": "If that account exists, a reset link has been sent."
    })))
}

#[post("/reset-password")]
#[instrument(skip_all)]
pub async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, AuthError> {
    state.auth_handler.reset_password(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Password has been reset"})))
}
