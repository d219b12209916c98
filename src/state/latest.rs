//! Stale-response guard
//!
//! When the same view is loaded twice in quick succession, the slower
//! response must not overwrite the newer one. Each load takes a token and the
//! view applies its result only if the token is still current.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use tracing::debug;

/// Ticket for one in-flight load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken<K> {
    key: K,
    generation: u64,
}

impl<K> RequestToken<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Per-key generation counter
#[derive(Debug)]
pub struct LatestRequests<K> {
    generations: Mutex<HashMap<K, u64>>,
}

impl<K> Default for LatestRequests<K> {
    fn default() -> Self {
        Self {
            generations: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> LatestRequests<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load for `key`, superseding any earlier one
    pub fn begin(&self, key: K) -> RequestToken<K> {
        let mut generations = self.generations.lock().unwrap_or_else(|p| p.into_inner());
        let generation = generations.entry(key.clone()).or_insert(0);
        *generation += 1;
        RequestToken {
            key,
            generation: *generation,
        }
    }

    pub fn is_current(&self, token: &RequestToken<K>) -> bool {
        let generations = self.generations.lock().unwrap_or_else(|p| p.into_inner());
        generations.get(&token.key) == Some(&token.generation)
    }

    /// Run `load` for `key`; `None` if a newer load for the same key started
    /// before this one finished
    pub async fn latest<F, T>(&self, key: K, load: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let token = self.begin(key);
        let value = load.await;
        if self.is_current(&token) {
            Some(value)
        } else {
            debug!("Discarding superseded response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_only_latest_token_is_current() {
        let latest = LatestRequests::new();
        let first = latest.begin(7_i64);
        let second = latest.begin(7_i64);
        let other = latest.begin(8_i64);

        assert!(!latest.is_current(&first));
        assert!(latest.is_current(&second));
        assert!(latest.is_current(&other));
    }

    #[tokio::test]
    async fn test_slow_earlier_load_is_discarded() {
        let latest = LatestRequests::new();
        let load = |value: &'static str, delay_ms: u64| async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            value
        };

        let (first, second, other) = tokio::join!(
            latest.latest(5_i64, load("old", 80)),
            latest.latest(5_i64, load("new", 5)),
            latest.latest(6_i64, load("unrelated", 40)),
        );

        assert_eq!(first, None);
        assert_eq!(second, Some("new"));
        assert_eq!(other, Some("unrelated"));
    }

    #[tokio::test]
    async fn test_sequential_loads_all_apply() {
        let latest = LatestRequests::new();
        assert_eq!(latest.latest(5_i64, async { 1 }).await, Some(1));
        assert_eq!(latest.latest(5_i64, async { 2 }).await, Some(2));
    }
}
