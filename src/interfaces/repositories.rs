pub mod contact_message;
pub mod project;
pub mod sqlx_repo;
pub mod user;
