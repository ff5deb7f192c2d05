use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::contact_message::{ContactMessageFilter, NewContactMessageForm, UpdateContactMessageRequest},
    errors::AppError,
    use_cases::extractors::{AdminClaims, ClientIp},
    AppState,
};

#[instrument(skip(state, data))]
pub async fn submit_contact_message(
    client_ip: ClientIp,
    state: web::Data<AppState>,
    data: web::Json<NewContactMessageForm>,
) -> Result<impl Responder, AppError> {
    let response = state.contact_handler
        .submit_contact_message(data.into_inner(), &client_ip.0)
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(_claims, state))]
pub async fn list_contact_messages(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ContactMessageFilter>,
) -> Result<impl Responder, AppError> {
    let response = state.contact_handler
        .list_contact_messages(query.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(_claims, state))]
pub async fn unread_count(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let count = state.contact_handler.unread_count().await?;
    Ok(HttpResponse::Ok().json(count))
}

#[instrument(skip(_claims, state))]
pub async fn get_contact_message(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message = state.contact_handler.get_contact_message(&message_id).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_contact_message(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateContactMessageRequest>,
) -> Result<impl Responder, AppError> {
    let updated = state.contact_handler
        .update_contact_message(&message_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_read_status(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let updated = state.contact_handler.toggle_read_status(&message_id).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(_claims, state))]
pub async fn delete_contact_message(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.contact_handler.delete_contact_message(&message_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
