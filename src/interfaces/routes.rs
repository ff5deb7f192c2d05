use actix_web::web;

use crate::handlers::home::home;

mod auth;
mod contact;
mod dashboard;
mod json_error;
mod projects;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .configure(auth::config_routes)
            .configure(dashboard::config_routes)
            .configure(projects::config_routes)
            .configure(contact::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
