//! Memoization of raw extracted colors

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::color::Rgb;
use crate::extraction::ExtractorKind;

/// Compound cache key: source identity and extraction strategy
///
/// Kept as separate fields so an identity that happens to end in an
/// extractor tag cannot collide with another entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub identity: String,
    pub kind: ExtractorKind,
}

impl CacheKey {
    pub fn new(identity: impl Into<String>, kind: ExtractorKind) -> Self {
        Self {
            identity: identity.into(),
            kind,
        }
    }
}

/// Raw (untweaked) colors keyed by source and extractor
///
/// Entries live as long as the cache and are never evicted. Concurrent
/// misses on one key may both extract; the last write wins, which is
/// harmless since extraction is deterministic.
#[derive(Debug, Default)]
pub struct ColorCache {
    entries: Mutex<HashMap<CacheKey, Rgb>>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Rgb>> {
        // Map values are plain colors, so a poisoned lock holds no torn state
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &CacheKey) -> Option<Rgb> {
        self.entries().get(key).copied()
    }

    pub fn insert(&self, key: CacheKey, color: Rgb) {
        self.entries().insert(key, color);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = ColorCache::new();
        let key = CacheKey::new("covers/ten.jpg", ExtractorKind::QuantizedDominant);

        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), Rgb::new(120, 60, 20));

        assert_eq!(cache.get(&key), Some(Rgb::new(120, 60, 20)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_kinds_do_not_collide() {
        let cache = ColorCache::new();
        cache.insert(
            CacheKey::new("help.jpg", ExtractorKind::AveragedSimple),
            Rgb::new(1, 1, 1),
        );
        cache.insert(
            CacheKey::new("help.jpg", ExtractorKind::AveragedDominant),
            Rgb::new(2, 2, 2),
        );

        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get(&CacheKey::new("help.jpg", ExtractorKind::AveragedSimple)),
            Some(Rgb::new(1, 1, 1))
        );
    }

    #[test]
    fn test_identity_containing_tag_does_not_collide() {
        // "a" + "fast-average" would equal "afast-average" under concatenation
        let cache = ColorCache::new();
        cache.insert(CacheKey::new("a", ExtractorKind::AveragedSimple), Rgb::new(1, 1, 1));

        let lookalike = CacheKey::new("afast-average", ExtractorKind::AveragedSimple);
        assert!(!cache.contains(&lookalike));
    }

    #[test]
    fn test_last_write_wins() {
        let cache = ColorCache::new();
        let key = CacheKey::new("x", ExtractorKind::QuantizedDominant);
        cache.insert(key.clone(), Rgb::new(1, 1, 1));
        cache.insert(key.clone(), Rgb::new(9, 9, 9));
        assert_eq!(cache.get(&key), Some(Rgb::new(9, 9, 9)));
        assert_eq!(cache.len(), 1);
    }
}
