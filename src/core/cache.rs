//! Key-value cache used by the gradebook
//!
//! Writers invalidate explicitly: after changing an entity they look up its
//! [`EntityKind::invalidation`] and drop either the affected student's keys or
//! everything. Grading computations never read or write the cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Minimal cache interface
pub trait Cache<V> {
    /// Value stored under `key`, unless missing or expired
    fn get(&mut self, key: &str) -> Option<V>;

    /// Store `value` under `key` for `ttl`
    fn put(&mut self, key: &str, value: V, ttl: Duration);

    /// Drop `key`. Returns whether something was removed.
    fn invalidate(&mut self, key: &str) -> bool;

    /// Drop every entry
    fn clear(&mut self);
}

/// Entities whose writes invalidate cached results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Catalog course
    Course,
    /// Course section
    Section,
    /// Student enrollment row
    Enrollment,
    /// Grade entry on an enrollment
    Grade,
    /// Student account
    Student,
}

/// How much of the cache a write makes stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Only entries belonging to the written student
    Student,
    /// Every entry; catalog data is shared by many students
    All,
}

impl EntityKind {
    /// Cache entries a write to this entity makes stale
    #[must_use]
    pub const fn invalidation(self) -> Invalidation {
        match self {
            Self::Course | Self::Section => Invalidation::All,
            Self::Enrollment | Self::Grade | Self::Student => Invalidation::Student,
        }
    }
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-process cache with per-entry expiry
pub struct MemoryCache<V> {
    entries: HashMap<String, Entry<V>>,
}

impl<V> MemoryCache<V> {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Number of entries, expired ones included until next access
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for MemoryCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<V: Clone> Cache<V> for MemoryCache<V> {
    fn get(&mut self, key: &str) -> Option<V> {
        let expired = self.entries.get(key)?.expires_at <= Instant::now();
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn put(&mut self, key: &str, value: V, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
