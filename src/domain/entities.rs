pub mod contact_message;
pub mod option_fields;
pub mod project;
pub mod token;
pub mod user;
