use actix_web::{get, web, HttpResponse, Responder};

use crate::{constants::API_PREFIX, AppState};

#[get("/")]
pub async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Welcome to {}", state.config.name),
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "api": API_PREFIX,
        "dashboard_login": state.config.login_path,
    }))
}
