
use actix_web::{http::{header, StatusCode}, test};
use serde_json::{json, Value};
use test_utils::*;

use portfolio_console::entities::project::{Project, ProjectListResponse, TagListResponse};

macro_rules! create_project {
    ($app:expr, $token:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/dashboard/projects")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", $token)))
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let project: Project = test::read_body_json(resp).await;
        project
    }};
}

#[actix_rt::test]
async fn tag_filter_is_exact_and_case_sensitive() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;
    let token = harness.admin_tokens().await.access_token;

    let site = create_project!(app, token, json!({"title": "Site", "tags": ["Frontend", "React"]}));
    create_project!(app, token, json!({"title": "Lower", "tags": ["frontend"]}));
    create_project!(app, token, json!({"title": "Api", "tags": ["Backend"]}));

    let req = test::TestRequest::get().uri("/api/v1/projects?tag=Frontend").to_request();
    let body: ProjectListResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.total, 1);
    assert_eq!(body.projects.len(), 1);
    assert_eq!(body.projects[0].id, site.id);
    assert!(body.projects.iter().all(|p| p.tags.iter().any(|t| t == "Frontend")));
}

#[actix_rt::test]
async fn deleted_project_disappears_from_cached_list() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;
    let token = harness.admin_tokens().await.access_token;

    let keep = create_project!(app, token, json!({"title": "Keep"}));
    let doomed = create_project!(app, token, json!({"title": "Doomed"}));

    // Warm the cache.
    let req = test::TestRequest::get().uri("/api/v1/projects").to_request();
    let before: ProjectListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(before.total, 2);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/dashboard/projects/{}", doomed.id))
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/v1/projects").to_request();
    let after: ProjectListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after.total, 1);
    assert_eq!(after.projects[0].id, keep.id);
    assert!(after.projects.iter().all(|p| p.id != doomed.id));
}

#[actix_rt::test]
async fn empty_title_is_rejected_with_field_details() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;
    let token = harness.admin_tokens().await.access_token;

    let req = test::TestRequest::post()
        .uri("/api/v1/dashboard/projects")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({"title": "  ", "project_url": "javascript:alert(1)"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"project_url"));

    let req = test::TestRequest::get().uri("/api/v1/projects").to_request();
    let list: ProjectListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.total, 0);
}

#[actix_rt::test]
async fn featured_tag_and_flag_drive_featured_filter() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;
    let token = harness.admin_tokens().await.access_token;

    let tagged = create_project!(app, token, json!({"title": "Tagged", "tags": ["Featured"]}));
    let flagged = create_project!(app, token, json!({"title": "Flagged", "featured": true}));
    create_project!(app, token, json!({"title": "Plain"}));

    assert!(tagged.featured);

    let req = test::TestRequest::get().uri("/api/v1/projects?featured=true").to_request();
    let body: ProjectListResponse = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<_> = body.projects.iter().map(|p| p.id).collect();
    assert_eq!(body.total, 2);
    assert!(ids.contains(&tagged.id));
    assert!(ids.contains(&flagged.id));
}

#[actix_rt::test]
async fn patch_distinguishes_absent_and_null() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;
    let token = harness.admin_tokens().await.access_token;

    let created = create_project!(app, token, json!({
        "title": "Console",
        "description": "Admin console",
        "tags": ["Rust", "Featured"],
    }));

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/dashboard/projects/{}", created.id))
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({"description": null, "tags": ["Rust"]}))
        .to_request();
    let updated: Project = test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated.title, "Console");
    assert_eq!(updated.description, None);
    assert_eq!(updated.tags, vec!["Rust".to_string()]);
    assert!(!updated.featured);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/dashboard/projects/{}", created.id))
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn get_project_by_id_handles_bad_and_unknown_ids() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;
    let token = harness.admin_tokens().await.access_token;
    let created = create_project!(app, token, json!({"title": "Found"}));

    let req = test::TestRequest::get().uri(&format!("/api/v1/projects/{}", created.id)).to_request();
    let found: Project = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found, created);

    let req = test::TestRequest::get().uri("/api/v1/projects/not-a-uuid").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/projects/{}", uuid::Uuid::new_v4()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn tags_are_distinct_and_sorted() {
    let harness = TestApp::new().await;
    let app = test::init_service(harness.app()).await;
    let token = harness.admin_tokens().await.access_token;

    create_project!(app, token, json!({"title": "One", "tags": ["Rust", "Backend"]}));
    create_project!(app, token, json!({"title": "Two", "tags": ["Backend", "Actix"]}));

    let req = test::TestRequest::get().uri("/api/v1/projects/tags").to_request();
    let body: TagListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.tags, vec!["Actix", "Backend", "Rust"]);
}
