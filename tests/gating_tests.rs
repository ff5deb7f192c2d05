
use actix_web::{http::{header, StatusCode}, test};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header, Algorithm};
use serde_json::{json, Value};
use test_utils::*;
use uuid::Uuid;

use portfolio_console::entities::token::{AuthResponse, Claims};

fn signed_claims(admin: bool, exp_offset_secs: i64) -> String {
    let config = test_config();
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "someone@example.com".to_string(),
        admin,
        exp: (now + exp_offset_secs) as usize,
        iat: now as usize,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap()
}

#[actix_rt::test]
async fn html_clients_are_redirected_to_login() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;

    for path in ["/api/v1/dashboard/projects", "/api/v1/dashboard/messages?unread_only=true", "/api/v1/dashboard/summary"] {
        let req = test::TestRequest::get()
            .uri(path)
            .insert_header((header::ACCEPT, "text/html,application/xhtml+xml"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, format!("/dashboard/login?next={}", urlencoding::encode(path)));
    }
}

#[actix_rt::test]
async fn percent_encoded_dashboard_path_is_still_gated() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/%64ashboard/projects")
        .insert_header((header::ACCEPT, "text/html"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    assert!(location.starts_with("/dashboard/login?next="));
}

#[actix_rt::test]
async fn api_clients_get_401_json() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/dashboard/projects/{}", Uuid::new_v4()))
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/health")
        .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let expired = signed_claims(true, -60);
    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/projects")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", expired)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Token has expired");
}

#[actix_rt::test]
async fn non_admin_tokens_are_forbidden() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/projects")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", signed_claims(false, 600))))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn public_and_login_routes_are_not_gated() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/projects")
        .insert_header((header::ACCEPT, "text/html"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header((header::ACCEPT, "text/html"))
        .set_json(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let auth: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(auth.token_type, "Bearer");

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/projects")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", auth.access_token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn trailing_slash_does_not_bypass_gate() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;

    let req = test::TestRequest::get().uri("/api/v1/dashboard/projects/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn logout_revokes_both_tokens() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;
    let tokens = harness.admin_tokens().await;
    let bearer = format!("Bearer {}", tokens.access_token);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header((header::AUTHORIZATION, bearer.clone()))
        .set_json(json!({"refresh_token": tokens.refresh_token}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/summary")
        .insert_header((header::AUTHORIZATION, bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({"refresh_token": tokens.refresh_token}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn refresh_tokens_are_single_use() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;
    let tokens = harness.admin_tokens().await;

    let refresh = || {
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({"refresh_token": tokens.refresh_token}))
            .to_request()
    };

    let resp = test::call_service(&app, refresh()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let renewed: AuthResponse = test::read_body_json(resp).await;
    assert_ne!(renewed.refresh_token, tokens.refresh_token);

    assert_eq!(test::call_service(&app, refresh()).await.status(), StatusCode::UNAUTHORIZED);
}
