use crate::rewrite::{Rewrite, RewriteMode};
use crate::risk::Platform;
use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// A rewrite set remembered for repeat requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRewrite {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub platform: Platform,
    pub mode: RewriteMode,
    pub rewrites: Vec<Rewrite>,
}

/// Prompts differ by platform as well as mode, so both are part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    platform: Platform,
    mode: RewriteMode,
}

impl CacheKey {
    fn new(text: &str, platform: Platform, mode: RewriteMode) -> Self {
        Self {
            text: text.to_string(),
            platform,
            mode,
        }
    }
}

/// Most recent rewrite sets keyed by (text, platform, mode), each valid for a
/// fixed TTL.
pub struct RewriteCache {
    entries: Mutex<LruCache<CacheKey, CachedRewrite>>,
    ttl: Duration,
}

impl RewriteCache {
    // NOTE: NonZeroUsize::new(5) is guaranteed to return Some since 5 > 0.
    pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(5) {
        Some(size) => size,
        None => panic!("Cache size must be non-zero"),
    };

    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, text: &str, platform: Platform, mode: RewriteMode) -> Option<CachedRewrite> {
        self.get_at(text, platform, mode, Utc::now())
    }

    pub fn get_at(
        &self,
        text: &str,
        platform: Platform,
        mode: RewriteMode,
        now: DateTime<Utc>,
    ) -> Option<CachedRewrite> {
        let Ok(mut entries) = self.entries.lock() else {
            warn!("Rewrite cache lock poisoned; treating as miss");
            return None;
        };
        let key = CacheKey::new(text, platform, mode);
        let expired = match entries.peek(&key) {
            Some(entry) => now - entry.created_at >= self.ttl,
            None => return None,
        };
        if expired {
            entries.pop(&key);
            return None;
        }
        let entry = entries.get(&key).cloned();
        if let Some(entry) = &entry {
            debug!("Cache hit for rewrite {}", entry.id);
        }
        entry
    }

    pub fn insert(
        &self,
        text: &str,
        platform: Platform,
        mode: RewriteMode,
        rewrites: Vec<Rewrite>,
    ) -> Uuid {
        self.insert_at(text, platform, mode, rewrites, Utc::now())
    }

    pub fn insert_at(
        &self,
        text: &str,
        platform: Platform,
        mode: RewriteMode,
        rewrites: Vec<Rewrite>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let entry = CachedRewrite {
            id: Uuid::new_v4(),
            created_at: now,
            platform,
            mode,
            rewrites,
        };
        let id = entry.id;
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.put(CacheKey::new(text, platform, mode), entry);
            }
            Err(_) => warn!("Rewrite cache lock poisoned; entry {} not stored", id),
        }
        id
    }

    /// Drops expired entries and returns how many were removed.
    pub fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let expired: Vec<CacheKey> = entries
            .iter()
            .filter(|(_, entry)| now - entry.created_at >= self.ttl)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        if !expired.is_empty() {
            debug!("Pruned {} expired rewrite sets", expired.len());
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RewriteCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY, Duration::hours(24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERAL: RewriteMode = RewriteMode::General;

    fn set(tag: &str) -> Vec<Rewrite> {
        vec![Rewrite::new("professional", tag)]
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = RewriteCache::default();
        let now = Utc::now();
        let id = cache.insert_at("hello", Platform::Slack, GENERAL, set("a"), now);

        let hit = cache.get_at("hello", Platform::Slack, GENERAL, now).unwrap();
        assert_eq!(hit.id, id);
        assert_eq!(hit.platform, Platform::Slack);
        assert!(cache
            .get_at("hello", Platform::Slack, RewriteMode::DeEscalation, now)
            .is_none());
        assert!(cache.get_at("other", Platform::Slack, GENERAL, now).is_none());
    }

    #[test]
    fn test_platform_is_part_of_key() {
        let cache = RewriteCache::default();
        let now = Utc::now();
        cache.insert_at("hello", Platform::Slack, GENERAL, set("slack"), now);

        assert!(cache.get_at("hello", Platform::Gmail, GENERAL, now).is_none());

        cache.insert_at("hello", Platform::Gmail, GENERAL, set("gmail"), now);
        let slack = cache.get_at("hello", Platform::Slack, GENERAL, now).unwrap();
        let gmail = cache.get_at("hello", Platform::Gmail, GENERAL, now).unwrap();
        assert_eq!(slack.rewrites[0].text, "slack");
        assert_eq!(gmail.rewrites[0].text, "gmail");
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = RewriteCache::default();
        let now = Utc::now();
        cache.insert_at("hello", Platform::General, GENERAL, set("a"), now);

        let later = now + Duration::hours(23);
        assert!(cache.get_at("hello", Platform::General, GENERAL, later).is_some());
        let expired = now + Duration::hours(24);
        assert!(cache.get_at("hello", Platform::General, GENERAL, expired).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keeps_only_most_recent_five() {
        let cache = RewriteCache::default();
        let now = Utc::now();
        for i in 0..7 {
            let text = format!("text {}", i);
            cache.insert_at(&text, Platform::General, GENERAL, set("x"), now);
        }
        assert_eq!(cache.len(), 5);
        assert!(cache.get_at("text 0", Platform::General, GENERAL, now).is_none());
        assert!(cache.get_at("text 6", Platform::General, GENERAL, now).is_some());
    }

    #[test]
    fn test_prune_expired() {
        let cache = RewriteCache::default();
        let now = Utc::now();
        let old = now - Duration::hours(30);
        cache.insert_at("old", Platform::General, GENERAL, set("a"), old);
        cache.insert_at("new", Platform::General, GENERAL, set("b"), now);
        assert_eq!(cache.prune_expired(now), 1);
        assert_eq!(cache.len(), 1);
    }
}
