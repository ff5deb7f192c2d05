use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Tag that marks a project as featured alongside the `featured` flag.
pub const FEATURED_TAG: &str = "Featured";

pub const API_PREFIX: &str = "/api/v1";
pub const DASHBOARD_PREFIX: &str = "/api/v1/dashboard";

/// Number of messages shown on the dashboard summary.
pub const RECENT_MESSAGES_LIMIT: i64 = 5;
