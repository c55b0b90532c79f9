use crate::error::AppError;
use crate::filter::ZipMatch;
use crate::model::LevelPriority;

/// Application configuration loaded explicitly from environment variables.
///
/// The flag webhook is configured separately via `FlagClientConfig::from_env`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filesystem path to the dataset export JSON.
    pub data_path: String,
    /// Listen address, e.g. "0.0.0.0:8080".
    pub bind_addr: String,
    /// Redis connection URL. `None` disables caching.
    pub redis_url: Option<String>,
    /// Postal-code matching policy.
    pub zip_match: ZipMatch,
    /// Display-priority order for resource levels.
    pub level_order: LevelPriority,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `RESOURCE_DATA_PATH`: path to the dataset export (must exist)
    ///
    /// Optional:
    /// - `BIND_ADDR`: listen address (default "0.0.0.0:8080")
    /// - `REDIS_URL`: Redis connection string (omit to disable caching)
    /// - `ZIP_MATCH`: "exact" (default) or "prefix"
    /// - `LEVEL_ORDER`: comma-separated level names overriding the default order
    pub fn from_env() -> Result<Self, AppError> {
        let data_path = std::env::var("RESOURCE_DATA_PATH").map_err(|_| {
            AppError::Config("RESOURCE_DATA_PATH environment variable is required".to_string())
        })?;

        if !std::path::Path::new(&data_path).exists() {
            return Err(AppError::Config(format!(
                "dataset file not found at {data_path}"
            )));
        }

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let redis_url = std::env::var("REDIS_URL").ok();

        let zip_match = match std::env::var("ZIP_MATCH") {
            Ok(value) => ZipMatch::parse(value.trim()).ok_or_else(|| {
                AppError::Config(format!(
                    "invalid ZIP_MATCH value: {value} (expected \"exact\" or \"prefix\")"
                ))
            })?,
            Err(_) => ZipMatch::default(),
        };

        let level_order = match std::env::var("LEVEL_ORDER") {
            Ok(value) => {
                let order: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                if order.is_empty() {
                    return Err(AppError::Config(
                        "LEVEL_ORDER must name at least one level".to_string(),
                    ));
                }
                LevelPriority::new(order)
            }
            Err(_) => LevelPriority::default(),
        };

        Ok(Self {
            data_path,
            bind_addr,
            redis_url,
            zip_match,
            level_order,
        })
    }
}
