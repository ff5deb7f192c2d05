use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, StatusCode},
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    constants::{API_PREFIX, DASHBOARD_PREFIX},
    entities::token::Claims,
    errors::AuthError,
    handlers::json_error::json_error,
    AppState,
};

/// Gates the dashboard API and logout behind a valid, unrevoked access token.
///
/// Unauthenticated browsers are sent to the login page with a `next`
/// parameter; API clients get a 401 JSON body.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if *req.method() == actix_web::http::Method::OPTIONS || !is_protected_route(routed_path(&req)) {
                return service.call(req).await;
            }

            let state = req.app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| {
                    tracing::error!("AppState missing in middleware");
                    AuthError::MissingJwtService
                })?;

            let claims = match extract_token(&req) {
                Some(token) => state.auth_handler.verify_access_token(&token),
                None => Err(AuthError::MissingCredentials),
            };

            let claims = match claims {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::warn!(path = %routed_path(&req), "Rejected unauthenticated request: {}", e);
                    let response = unauthenticated_response(&req, &state.config.login_path, &e);
                    return Ok(req.into_response(response));
                }
            };

            if let Err(forbidden) = enforce_admin_access(routed_path(&req), &claims) {
                return Ok(req.into_response(forbidden));
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

/// Path as the router sees it, with percent-encoded unreserved characters
/// decoded.
fn routed_path(req: &ServiceRequest) -> &str {
    req.match_info().as_str()
}

fn is_protected_route(path: &str) -> bool {
    path == DASHBOARD_PREFIX
        || path.starts_with(&format!("{DASHBOARD_PREFIX}/"))
        || path == format!("{API_PREFIX}/auth/logout")
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let mut parts = header.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                    Some(token.to_string())
                }
                _ => None,
            }
        })
}

fn prefers_html(req: &ServiceRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn unauthenticated_response(req: &ServiceRequest, login_path: &str, err: &AuthError) -> HttpResponse {
    if prefers_html(req) {
        let next = match req.query_string() {
            "" => routed_path(req).to_string(),
            query => format!("{}?{}", routed_path(req), query),
        };
        let location = format!("{}?next={}", login_path, urlencoding::encode(&next));

        return HttpResponse::SeeOther()
            .insert_header((header::LOCATION, location))
            .finish();
    }

    let message = match err {
        AuthError::TokenExpired => "Token has expired".to_string(),
        other => other.to_string(),
    };
    json_error(StatusCode::UNAUTHORIZED, &message)
}

fn enforce_admin_access(path: &str, claims: &Claims) -> Result<(), HttpResponse> {
    if path.starts_with(DASHBOARD_PREFIX) && !claims.admin {
        tracing::warn!(user_id = %claims.sub, "Admin access required for path: {}", path);
        return Err(json_error(StatusCode::FORBIDDEN, "Admin access required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_routes() {
        assert!(is_protected_route("/api/v1/dashboard"));
        assert!(is_protected_route("/api/v1/dashboard/projects"));
        assert!(is_protected_route("/api/v1/auth/logout"));

        assert!(!is_protected_route("/api/v1/dashboardx"));
        assert!(!is_protected_route("/api/v1/auth/login"));
        assert!(!is_protected_route("/api/v1/projects"));
        assert!(!is_protected_route("/"));
    }
}
