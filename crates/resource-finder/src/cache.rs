/// Redis caching layer for filtered result sets.
///
/// Key schema (namespaced to avoid collisions):
/// - `dir:v1:results:{fingerprint}:{sha256(filters)}` — JSON list of resource ids
///   in display order (TTL: 3600s)
///
/// Keys embed the catalog fingerprint, and the whole namespace is dropped on
/// reload, so a swapped catalog can never serve stale ids. Without Redis every
/// read is a miss and the caller recomputes from the in-memory catalog.
use sha2::{Digest, Sha256};

use directory_common::redis::RedisStore;

use crate::filter::ActiveFilterSet;

const KEY_PREFIX: &str = "dir:v1:";
const RESULTS_TTL_SECS: u64 = 3600;

pub struct ResultCache {
    store: RedisStore,
}

impl ResultCache {
    pub fn new(store: RedisStore) -> Self {
        Self { store }
    }

    pub async fn get_results(
        &self,
        fingerprint: &str,
        filters: &ActiveFilterSet,
    ) -> Option<Vec<String>> {
        self.store.get_json(&results_key(fingerprint, filters)).await
    }

    pub async fn set_results(
        &self,
        fingerprint: &str,
        filters: &ActiveFilterSet,
        ids: &[String],
    ) {
        self.store
            .put_json(
                &results_key(fingerprint, filters),
                ids,
                Some(RESULTS_TTL_SECS),
            )
            .await;
    }

    /// Drop every cached entry. Called when the catalog is reloaded.
    pub async fn invalidate_all(&self) {
        self.store.delete_prefix(KEY_PREFIX).await;
    }
}

/// Deterministic key for one filter combination against one catalog revision.
fn results_key(fingerprint: &str, filters: &ActiveFilterSet) -> String {
    let json = serde_json::to_string(filters).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{KEY_PREFIX}results:{fingerprint}:{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_key_is_stable_and_distinct() {
        let empty = ActiveFilterSet::default();
        let mut search = ActiveFilterSet::default();
        search.search = Some("food".to_string());

        assert_eq!(results_key("abc", &empty), results_key("abc", &empty));
        assert_ne!(results_key("abc", &empty), results_key("abc", &search));
        assert_ne!(results_key("abc", &empty), results_key("def", &empty));
    }

    #[tokio::test]
    async fn test_degrades_without_redis() {
        let cache = ResultCache::new(RedisStore::connect(None));
        let filters = ActiveFilterSet::default();
        cache.set_results("abc", &filters, &["rec1".to_string()]).await;
        assert!(cache.get_results("abc", &filters).await.is_none());
    }
}
