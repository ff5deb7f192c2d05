pub mod denylist;
pub mod jwt;
pub mod password;
