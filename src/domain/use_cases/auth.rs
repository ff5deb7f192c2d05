use std::{sync::Arc, time::Duration};

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    denylist::TokenDenylist,
    jwt::JwtService,
    password::{generate_reset_secret, hash_password, verify_password},
};
use crate::entities::token::{AuthResponse, Claims};
use crate::entities::user::{
    AdminUser, AdminUserInsert, ForgotPasswordRequest, LoginUser, PasswordResetToken,
    ResetPasswordRequest,
};
use crate::errors::{AppError, AuthError};
use crate::limiter::rate_limiter::RateLimiterStore;
use crate::repositories::user::AdminUserRepository;
use crate::use_cases::reset_notifier::ResetNotifier;

const LOGIN_WINDOW: Duration = Duration::from_secs(60);

/// Settings for the password reset flow.
#[derive(Debug, Clone)]
pub struct ResetPolicy {
    pub link_base: String,
    pub ttl: chrono::Duration,
}

pub struct AuthHandler {
    pub user_repo: Arc<dyn AdminUserRepository>,
    pub token_service: JwtService,
    pub denylist: TokenDenylist,
    notifier: Arc<dyn ResetNotifier>,
    limiter: RateLimiterStore,
    login_limit: u64,
    reset_policy: ResetPolicy,
}

impl AuthHandler {
    pub fn new(
        user_repo: Arc<dyn AdminUserRepository>,
        token_service: JwtService,
        notifier: Arc<dyn ResetNotifier>,
        limiter: RateLimiterStore,
        login_limit: u64,
        reset_policy: ResetPolicy,
    ) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            denylist: TokenDenylist::new(),
            notifier,
            limiter,
            login_limit,
            reset_policy,
        }
    }

    /// Logs in an admin by validating credentials and generating JWTs
    pub async fn login(&self, request: LoginUser, client_ip: &str) -> Result<AuthResponse, AuthError> {
        self.limiter
            .check(&format!("login:ip:{}", client_ip), self.login_limit, LOGIN_WINDOW)
            .map_err(AuthError::RateLimited)?;

        request.validate().map_err(|_| AuthError::WrongCredentials)?;

        let user = self.user_repo.get_user_by_email(&request.email)
            .await
            .map_err(|e| {
                tracing::error!("Admin lookup failed: {}", e);
                AuthError::WrongCredentials
            })?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            tracing::warn!("Rejected login for {}", user.email);
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "Admin logged in");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: &AdminUser) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)?;
        let refresh_token = self.token_service.create_refresh_jwt(&user.id)?;

        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Decodes an access token and rejects it if it was logged out.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.token_service.decode_jwt(token)?.claims;
        if self.denylist.is_revoked(&claims.jti) {
            return Err(AuthError::TokenRevoked);
        }
        Ok(claims)
    }

    /// Exchanges a refresh token for a new pair. The presented refresh
    /// token is single use.
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let decoded = self.token_service.decode_refresh_jwt(token)?;
        // Claimed before issuing, so only one exchange per token can win.
        if !self.denylist.revoke(&decoded.claims.jti, decoded.claims.exp) {
            return Err(AuthError::TokenRevoked);
        }

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AuthError::InvalidUserId)?;

        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.create_auth_response(&user)
    }

    /// Revokes the caller's access token and, if it decodes, the refresh token.
    pub fn logout(&self, claims: &Claims, refresh_token: &str) -> Result<(), AuthError> {
        self.denylist.revoke(&claims.jti, claims.exp);

        match self.token_service.decode_refresh_jwt(refresh_token) {
            Ok(refresh) if refresh.claims.sub == claims.sub => {
                self.denylist.revoke(&refresh.claims.jti, refresh.claims.exp);
            }
            Ok(_) => tracing::warn!("Refresh token presented at logout belongs to another subject"),
            Err(e) => tracing::debug!("Refresh token not revoked at logout: {}", e),
        }

        tracing::info!(user_id = %claims.sub, "Admin logged out");
        Ok(())
    }

    /// Issues a reset link when the email belongs to an admin. The outcome
    /// is never revealed to the caller.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        let Some(user) = self.user_repo.get_user_by_email(&request.email).await? else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        };

        let secret = generate_reset_secret();
        let now = Utc::now();
        let token = PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: user.id,
            token_hash: hash_password(&secret)?,
            expires_at: now + self.reset_policy.ttl,
            used_at: None,
            created_at: now,
        };
        self.user_repo.create_reset_token(&token).await?;

        let raw_token = format!("{}.{}", token.id, secret);
        let link = format!(
            "{}?token={}",
            self.reset_policy.link_base,
            urlencoding::encode(&raw_token)
        );

        self.notifier.send_reset_link(&user.email, &link).await
    }

    /// Sets a new password using a token issued by `forgot_password`.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AuthError> {
        request.validate()?;

        let (id_part, secret) = request.token.trim()
            .split_once('.')
            .ok_or(AuthError::InvalidResetToken)?;
        let token_id = Uuid::parse_str(id_part).map_err(|_| AuthError::InvalidResetToken)?;

        let stored = self.user_repo.get_reset_token(&token_id)
            .await?
            .filter(|t| t.is_usable(Utc::now()))
            .ok_or(AuthError::InvalidResetToken)?;

        if !verify_password(secret, &stored.token_hash)? {
            tracing::warn!(token_id = %token_id, "Reset token secret mismatch");
            return Err(AuthError::InvalidResetToken);
        }

        let password_hash = hash_password(&request.new_password)?;
        let applied = self.user_repo
            .complete_password_reset(&stored.id, &stored.user_id, &password_hash)
            .await?;
        if !applied {
            return Err(AuthError::InvalidResetToken);
        }

        tracing::info!(user_id = %stored.user_id, "Password reset completed");
        Ok(())
    }

    /// Creates the configured admin account if it does not exist yet.
    /// Returns whether an account was created.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<bool, AppError> {
        let email = email.trim().to_lowercase();
        if self.user_repo.get_user_by_email(&email).await?.is_some() {
            return Ok(false);
        }

        let password_hash = hash_password(password)?;
        let id = self.user_repo
            .create_user(&AdminUserInsert { email: email.clone(), password_hash })
            .await?;

        tracing::info!(user_id = %id, %email, "Admin account created");
        Ok(true)
    }

    /// Purges expired or consumed reset tokens and stale deny-list entries.
    pub async fn purge_expired(&self) -> Result<(usize, u64), AppError> {
        let revoked = self.denylist.purge_expired();
        let tokens = self.user_repo.purge_stale_reset_tokens().await?;
        Ok((revoked, tokens))
    }
}
