use actix_web::web;

use crate::handlers::{contact_messages, dashboard, projects, system};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard")
            .service(system::health_check)
            .service(dashboard::summary)
            .service(
                web::resource("/projects")
                    .route(web::get().to(projects::admin_list_projects))
                    .route(web::post().to(projects::create_project))
            )
            .service(
                web::resource("/projects/{project_id}")
                    .route(web::patch().to(projects::update_project))
                    .route(web::delete().to(projects::delete_project))
            )
            .service(
                web::resource("/messages")
                    .route(web::get().to(contact_messages::list_contact_messages))
            )
            .service(
                web::resource("/messages/unread-count")
                    .route(web::get().to(contact_messages::unread_count))
            )
            .service(
                web::resource("/messages/{message_id}")
                    .route(web::get().to(contact_messages::get_contact_message))
                    .route(web::patch().to(contact_messages::update_contact_message))
                    .route(web::delete().to(contact_messages::delete_contact_message))
            )
            .service(
                web::resource("/messages/{message_id}/toggle-read")
                    .route(web::post().to(contact_messages::toggle_read_status))
            )
    );
}
