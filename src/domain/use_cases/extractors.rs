use actix_web::{web, FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};

use crate::{entities::token::Claims, errors::AuthError, utils::get_client_ip::get_client_ip, AppState};

/// Claims placed in the request extensions by `AuthMiddleware`.
/// Rejects with 401 when the route was not gated.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthClaims(claims.clone()))),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}

/// Like `AuthClaims` but also requires the admin flag (403 otherwise).
#[derive(Debug)]
pub struct AdminClaims(pub Claims);

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<Claims>() {
            Some(claims) if claims.admin => Ok(AdminClaims(claims.clone())),
            Some(_) => Err(AuthError::Forbidden("Admin access required".into()).into()),
            None => Err(AuthError::MissingCredentials.into()),
        };
        ready(result)
    }
}

/// Caller address used as a rate-limit key.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl FromRequest for ClientIp {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let trust_proxy = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.config.trust_x_forwarded_for)
            .unwrap_or(false);

        ready(Ok(ClientIp(get_client_ip(req, trust_proxy))))
    }
}
