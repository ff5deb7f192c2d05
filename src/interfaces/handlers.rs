pub mod auth;
pub mod contact_messages;
pub mod dashboard;
pub mod home;
pub mod json_error;
pub mod projects;
pub mod system;
