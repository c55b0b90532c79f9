/// Reload service for the resource catalog.
///
/// Re-reads the dataset file, and when its fingerprint differs from the loaded
/// catalog, re-parses, swaps the in-memory catalog, and invalidates the result
/// cache. Startup uses the same parse path; this runs on demand via the admin
/// endpoint afterwards.
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::cache::ResultCache;
use crate::catalog::{self, Catalog};
use crate::config::Config;
use crate::error::AppError;

/// Outcome of a reload attempt.
#[derive(Debug, Serialize)]
pub struct ReloadResult {
    /// Whether the catalog was actually swapped (false if already up to date).
    pub reloaded: bool,
    /// Fingerprint of the dataset file as it is now.
    pub fingerprint: String,
    /// Number of resources after the attempt.
    pub resource_count: usize,
}

pub struct ReloadService {
    config: Config,
    catalog: Arc<RwLock<Catalog>>,
    cache: Arc<ResultCache>,
}

impl ReloadService {
    pub fn new(config: Config, catalog: Arc<RwLock<Catalog>>, cache: Arc<ResultCache>) -> Self {
        Self {
            config,
            catalog,
            cache,
        }
    }

    /// Re-read the dataset file and swap the catalog if its contents changed.
    pub async fn reload_if_changed(&self) -> Result<ReloadResult, AppError> {
        let raw = std::fs::read_to_string(&self.config.data_path).map_err(|e| {
            AppError::Catalog(format!("failed to read {}: {e}", self.config.data_path))
        })?;
        let fingerprint = catalog::fingerprint(&raw);

        {
            let current = self.catalog.read().await;
            if current.fingerprint == fingerprint {
                info!(fingerprint = %fingerprint, "catalog up to date, skipping reload");
                return Ok(ReloadResult {
                    reloaded: false,
                    fingerprint,
                    resource_count: current.len(),
                });
            }
        }

        let new_catalog = catalog::parse(&raw, &self.config.level_order)?;
        let resource_count = new_catalog.len();
        *self.catalog.write().await = new_catalog;
        self.cache.invalidate_all().await;

        info!(
            fingerprint = %fingerprint,
            resources = resource_count,
            "catalog reloaded"
        );

        Ok(ReloadResult {
            reloaded: true,
            fingerprint,
            resource_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ZipMatch;
    use crate::model::LevelPriority;
    use directory_common::redis::RedisStore;

    fn export_with(names: &[&str]) -> String {
        let records: Vec<serde_json::Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                serde_json::json!({ "id": format!("rec{i}"), "fields": { "Name": name } })
            })
            .collect();
        serde_json::json!({ "records": records }).to_string()
    }

    fn service_for(path: &std::path::Path) -> (ReloadService, Arc<RwLock<Catalog>>) {
        let config = Config {
            data_path: path.to_string_lossy().into_owned(),
            bind_addr: "127.0.0.1:0".to_string(),
            redis_url: None,
            zip_match: ZipMatch::Exact,
            level_order: LevelPriority::default(),
        };
        let catalog = catalog::load(path, &config.level_order).unwrap();
        let catalog = Arc::new(RwLock::new(catalog));
        let cache = Arc::new(ResultCache::new(RedisStore::connect(None)));
        (
            ReloadService::new(config, Arc::clone(&catalog), cache),
            catalog,
        )
    }

    #[tokio::test]
    async fn test_reload_only_when_contents_change() {
        let path = std::env::temp_dir().join(format!(
            "resource-finder-reload-test-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, export_with(&["Food Shelf"])).unwrap();

        let (service, catalog) = service_for(&path);

        // Unchanged file: no swap.
        let result = service.reload_if_changed().await.unwrap();
        assert!(!result.reloaded);
        assert_eq!(result.resource_count, 1);

        // Changed file: swap and report the new count.
        std::fs::write(&path, export_with(&["Food Shelf", "Legal Aid"])).unwrap();
        let result = service.reload_if_changed().await.unwrap();
        assert!(result.reloaded);
        assert_eq!(result.resource_count, 2);
        assert_eq!(catalog.read().await.len(), 2);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "resource-finder-reload-missing-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, export_with(&["Food Shelf"])).unwrap();
        let (service, _catalog) = service_for(&path);
        std::fs::remove_file(&path).unwrap();

        let result = service.reload_if_changed().await;
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }
}
