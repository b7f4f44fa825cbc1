//! Video models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Video metadata record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration: f64,
    pub genre: String,
    pub tags: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a video
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub duration: f64,
    pub genre: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
}

/// Partial-update payload; only supplied fields change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<f64>,
    pub genre: Option<String>,
    pub tags: Option<Vec<String>>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
}

/// Raw query parameters for video listing
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListQuery {
    /// Exact genre filter
    pub genre: Option<String>,
    /// Comma-separated tags; a video matches if any tag overlaps
    pub tags: Option<String>,
    /// Case-insensitive substring match on title or description
    pub search: Option<String>,
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
}

/// Normalized listing filter with paging applied
#[derive(Debug, Clone)]
pub struct VideoFilter {
    pub genre: Option<String>,
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl VideoFilter {
    /// Normalize raw query parameters: 1-based page, limit clamped to 1..=100
    pub fn from_query(query: VideoListQuery) -> Self {
        let tags = query
            .tags
            .map(|raw| {
                raw.split(',')
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        VideoFilter {
            genre: query.genre.filter(|g| !g.is_empty()),
            tags,
            search: query.search.filter(|s| !s.is_empty()),
            page: query.page.unwrap_or(1).max(1),
            limit: query.limit.unwrap_or(10).clamp(1, 100),
        }
    }
}

/// Pagination metadata for listing responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Compute pagination metadata; total pages = ceil(total / limit)
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i64 = i64::from(limit);
        let total_pages = (total + limit_i64 - 1) / limit_i64;

        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Paginated listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedVideos {
    pub data: Vec<Video>,
    pub pagination: Pagination,
}
