use actix_web::{http::StatusCode, HttpResponse};

/// Error body in the same `{"error": ...}` shape the error enums produce.
pub fn json_error(status: StatusCode, error: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error,
    }))
}
