use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

/// Revoked token ids (`jti`) kept until the token would have expired anyway.
#[derive(Clone, Default)]
pub struct TokenDenylist {
    entries: Arc<DashMap<String, usize>>,
}

impl TokenDenylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the id was already revoked.
    pub fn revoke(&self, jti: &str, exp: usize) -> bool {
        self.entries.insert(jti.to_string(), exp).is_none()
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.entries.contains_key(jti)
    }

    /// Drops entries whose token has expired; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now().timestamp() as usize;
        let before = self.entries.len();
        self.entries.retain(|_, exp| *exp > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
