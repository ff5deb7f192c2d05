use actix_web::web;

use crate::handlers::contact_messages;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .route(web::post().to(contact_messages::submit_contact_message))
    );
}
