/// JSON-typed Redis store with graceful degradation.
///
/// Values are stored as JSON strings and (de)serialized at the call site's type. On
/// any Redis error the operation logs a warning and reports a miss; callers fall
/// through to compute from source. The system is fully functional without Redis.
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub struct RedisStore {
    client: Option<redis::Client>,
}

impl RedisStore {
    /// Attempt to set up a Redis client. A `None` URL, or a URL the client rejects,
    /// yields a store whose every operation is a no-op.
    pub fn connect(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, cache disabled"))
                .ok()
        });
        Self { client }
    }

    /// Send a PING to test reachability.
    pub async fn ping(&self) -> bool {
        let Some(mut conn) = self.conn().await else {
            return false;
        };
        let result: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    /// Fetch and deserialize a value. `None` on miss, on unavailable Redis, or on a
    /// stale entry that no longer deserializes.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn().await?;
        let json: Option<String> = conn
            .get(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GET failed"))
            .ok()?;
        serde_json::from_str(&json?)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    /// Serialize and store a value, with an optional TTL in seconds. Returns `true`
    /// when the write went through.
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: Option<u64>,
    ) -> bool {
        let Ok(json) = serde_json::to_string(value) else {
            return false;
        };
        let Some(mut conn) = self.conn().await else {
            return false;
        };
        let result = match ttl_secs {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, json, ttl).await,
            None => conn.set::<_, _, ()>(key, json).await,
        };
        result
            .inspect_err(|e| warn!(error = %e, key, "redis SET failed"))
            .is_ok()
    }

    /// Delete every key starting with `prefix`, via SCAN (KEYS would block the server).
    pub async fn delete_prefix(&self, prefix: &str) -> bool {
        let Some(mut conn) = self.conn().await else {
            return false;
        };

        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = match redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, pattern, "redis SCAN failed");
                    return false;
                }
            };

            if !keys.is_empty() {
                if let Err(e) = conn.del::<_, ()>(&keys).await {
                    warn!(error = %e, "redis batch DEL failed during prefix delete");
                    return false;
                }
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        true
    }

    async fn conn(&self) -> Option<redis::aio::MultiplexedConnection> {
        let client = self.client.as_ref()?;
        client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()
    }
}
