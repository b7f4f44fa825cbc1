//! Cache service for listing memoization
//!
//! A JSON layer over the shared Redis pool. Every backend failure is
//! logged and absorbed: reads collapse to a miss and writes are
//! best-effort, so the cache never affects request correctness. Each code
//! path that reads from here must be able to recompute from the database.

use common::cache::RedisPool;
use serde::{Serialize, de::DeserializeOwned};
use tracing::error;
use uuid::Uuid;

use crate::models::video::VideoFilter;

/// TTL for cached listing responses, in seconds
pub const LISTING_TTL_SECONDS: u64 = 300;

/// Best-effort cache over Redis
#[derive(Clone)]
pub struct CacheService {
    redis: RedisPool,
}

impl CacheService {
    /// Create a new cache service
    pub fn new(redis: RedisPool) -> Self {
        Self { redis }
    }

    /// Look up a cached value; any backend or decode failure is a miss
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.redis.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    error!("Cache decode error for {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("Redis GET error for {}: {}", key, e);
                None
            }
        }
    }

    /// Store a value with a TTL, best-effort
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Cache encode error for {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.redis.set(key, &raw, Some(ttl_seconds)).await {
            error!("Redis SET error for {}: {}", key, e);
        }
    }

    /// Remove a single key, best-effort
    pub async fn delete(&self, key: &str) {
        if let Err(e) = self.redis.delete(key).await {
            error!("Redis DEL error for {}: {}", key, e);
        }
    }

    /// Drop every cached listing belonging to one owner
    ///
    /// The pattern is owner-scoped, so other users' entries survive.
    pub async fn invalidate_listings(&self, owner_id: Uuid) {
        let pattern = owner_listing_pattern(owner_id);
        if let Err(e) = self.redis.delete_pattern(&pattern).await {
            error!("Redis pattern delete error for {}: {}", pattern, e);
        }
    }
}

/// Cache key for one page of one owner's filtered listing
pub fn listing_key(owner_id: Uuid, filter: &VideoFilter) -> String {
    let genre = filter.genre.as_deref().unwrap_or("all");
    let tags = if filter.tags.is_empty() {
        "all".to_string()
    } else {
        filter.tags.join("-")
    };
    let search = filter.search.as_deref().unwrap_or("all");

    format!(
        "videos:{}:{}:{}:{}:{}:{}",
        owner_id, genre, tags, search, filter.page, filter.limit
    )
}

/// Glob pattern matching all cached listings for one owner
fn owner_listing_pattern(owner_id: Uuid) -> String {
    format!("videos:{}:*", owner_id)
}
