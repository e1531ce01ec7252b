/*!
 * Translation caching functionality.
 *
 * Successful translations are memoised per process so that retrying a
 * language does not pay again for segments that already went through.
 * Failures are never stored.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::debug;

use super::prompts::ContentKind;

/// Cache key combining content kind, source text and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Prompt kind the text was translated with
    kind: ContentKind,

    /// Protected source text sent to the provider
    source_text: String,

    /// Target language code
    target_language: String,
}

impl CacheKey {
    fn new(kind: ContentKind, source_text: &str, target_language: &str) -> Self {
        Self {
            kind,
            source_text: source_text.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, String>,
    hits: usize,
    misses: usize,
}

/// Translation cache for storing and retrieving translations
#[derive(Debug, Clone)]
pub struct TranslationCache {
    /// Shared storage and counters
    state: Arc<RwLock<CacheState>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl TranslationCache {
    /// Create a new translation cache
    pub fn new(enabled: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            enabled,
        }
    }

    /// Get a translation from the cache
    pub fn get(&self, kind: ContentKind, source_text: &str, target_language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(kind, source_text, target_language);
        let mut state = self.state.write();

        match state.entries.get(&key).cloned() {
            Some(translation) => {
                state.hits += 1;
                debug!(
                    "Cache hit for {} '{}' (-> {})",
                    kind.label(),
                    truncate_text(source_text, 30),
                    target_language
                );
                Some(translation)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    /// Store a translation in the cache
    pub fn store(&self, kind: ContentKind, source_text: &str, target_language: &str, translation: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(kind, source_text, target_language);
        self.state.write().entries.insert(key, translation.to_string());
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let state = self.state.read();
        let total = state.hits + state.misses;

        let hit_rate = if total > 0 {
            state.hits as f64 / total as f64
        } else {
            0.0
        };

        (state.hits, state.misses, hit_rate)
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
