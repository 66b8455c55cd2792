use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Live search sessions, keyed by user id.
pub struct SearchSessionRegistry {
    sessions: DashMap<String, Vec<u64>>,
}

impl Default for SearchSessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Record a new session for a user and return its id.
    pub fn register(&self, user_id: &str) -> u64 {
        let id = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.sessions
            .entry(user_id.to_string())
            .or_default()
            .push(id);
        id
    }

    pub fn unregister(&self, user_id: &str, session_id: u64) {
        if let Some(mut sessions) = self.sessions.get_mut(user_id) {
            sessions.retain(|id| *id != session_id);
            if sessions.is_empty() {
                drop(sessions);
                self.sessions.remove(user_id);
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.sessions.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn count_for_user(&self, user_id: &str) -> usize {
        self.sessions.get(user_id).map_or(0, |s| s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_sessions_per_user() {
        let registry = SearchSessionRegistry::new();
        let a = registry.register("alice");
        let b = registry.register("alice");
        registry.register("bob");

        assert_ne!(a, b);
        assert_eq!(registry.active_count(), 3);
        assert_eq!(registry.count_for_user("alice"), 2);

        registry.unregister("alice", a);
        registry.unregister("alice", b);
        assert_eq!(registry.count_for_user("alice"), 0);
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn unregistering_unknown_session_is_harmless() {
        let registry = SearchSessionRegistry::new();
        registry.unregister("nobody", 42);
        assert_eq!(registry.active_count(), 0);
    }
}
