//! Short-lived cache for task listings.
//!
//! Listing pages are memoized per (scope, page, limit) for a configurable
//! TTL. Every mutating task operation invalidates the affected scopes
//! synchronously so a listing never outlives the data it was built from.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::models::TaskPage;

/// Whose listing a cached page belongs to: one user's, or the admin view of
/// all tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    User(i32),
    AllTasks,
}

struct Entry {
    page: TaskPage,
    inserted_at: Instant,
}

pub struct ListCache {
    ttl: Duration,
    entries: DashMap<(Scope, i64, i64), Entry>,
}

impl ListCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, scope: Scope, page: i64, limit: i64) -> Option<TaskPage> {
        let key = (scope, page, limit);
        let fresh = {
            let entry = self.entries.get(&key)?;
            if entry.inserted_at.elapsed() < self.ttl {
                Some(entry.page.clone())
            } else {
                None
            }
        };
        if fresh.is_none() {
            self.entries.remove(&key);
        }
        fresh
    }

    pub fn insert(&self, scope: Scope, page: i64, limit: i64, value: TaskPage) {
        self.entries.insert(
            (scope, page, limit),
            Entry {
                page: value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drops every cached page for the given user, plus the admin view
    /// (which contains that user's tasks too).
    pub fn invalidate_user(&self, user_id: i32) {
        self.entries
            .retain(|(scope, _, _), _| *scope != Scope::User(user_id) && *scope != Scope::AllTasks);
    }

    /// Drops everything. Used when the owner of a mutated task is unknown,
    /// e.g. an admin delete by task id.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total: i64) -> TaskPage {
        TaskPage::new(Vec::new(), total, 1, 10)
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ListCache::new(Duration::from_secs(60));
        cache.insert(Scope::User(1), 1, 10, page_of(3));

        let hit = cache.get(Scope::User(1), 1, 10).unwrap();
        assert_eq!(hit.total, 3);

        assert!(cache.get(Scope::User(2), 1, 10).is_none());
        assert!(cache.get(Scope::User(1), 2, 10).is_none());
    }

    #[test]
    fn test_expired_entries_miss() {
        let cache = ListCache::new(Duration::ZERO);
        cache.insert(Scope::User(1), 1, 10, page_of(3));
        assert!(cache.get(Scope::User(1), 1, 10).is_none());
    }

    #[test]
    fn test_invalidate_user_also_drops_admin_view() {
        let cache = ListCache::new(Duration::from_secs(60));
        cache.insert(Scope::User(1), 1, 10, page_of(1));
        cache.insert(Scope::User(2), 1, 10, page_of(2));
        cache.insert(Scope::AllTasks, 1, 10, page_of(3));

        cache.invalidate_user(1);

        assert!(cache.get(Scope::User(1), 1, 10).is_none());
        assert!(cache.get(Scope::AllTasks, 1, 10).is_none());
        assert!(cache.get(Scope::User(2), 1, 10).is_some());
    }

    #[test]
    fn test_clear() {
        let cache = ListCache::new(Duration::from_secs(60));
        cache.insert(Scope::User(1), 1, 10, page_of(1));
        cache.insert(Scope::AllTasks, 1, 10, page_of(2));

        cache.clear();

        assert!(cache.get(Scope::User(1), 1, 10).is_none());
        assert!(cache.get(Scope::AllTasks, 1, 10).is_none());
    }
}
