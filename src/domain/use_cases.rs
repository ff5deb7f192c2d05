pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod extractors;
pub mod projects;
pub mod reset_notifier;
