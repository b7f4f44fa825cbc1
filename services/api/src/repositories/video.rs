//! Video repository for database operations
//!
//! All queries are owner-scoped: reads, updates, and deletes filter by
//! `user_id`, so a video belonging to another user is indistinguishable
//! from a missing one.

use anyhow::Result;
use sqlx::{Postgres, QueryBuilder, PgPool};
use uuid::Uuid;

use crate::models::video::{NewVideo, UpdateVideo, Video, VideoFilter};

const VIDEO_COLUMNS: &str = "id, user_id, title, description, duration, genre, tags, \
                             thumbnail_url, video_url, created_at, updated_at";

/// Video repository for database operations
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    /// Create a new video repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a video owned by the given user
    pub async fn create(&self, owner_id: Uuid, fields: &NewVideo) -> Result<Video> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (user_id, title, description, duration, genre, tags, thumbnail_url, video_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, title, description, duration, genre, tags, thumbnail_url, video_url, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.duration)
        .bind(&fields.genre)
        .bind(&fields.tags)
        .bind(&fields.thumbnail_url)
        .bind(&fields.video_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(video)
    }

    /// Get a video by ID, scoped to its owner
    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, description, duration, genre, tags, thumbnail_url, video_url, created_at, updated_at
            FROM videos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    /// Apply a partial update to a video, scoped to its owner
    ///
    /// Only supplied fields change; `updated_at` always refreshes on
    /// success. Returns None when the id does not exist for this owner.
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &UpdateVideo,
    ) -> Result<Option<Video>> {
        let mut query = QueryBuilder::new("UPDATE videos SET updated_at = now()");

        if let Some(title) = &fields.title {
            query.push(", title = ");
            query.push_bind(title.clone());
        }
        if let Some(description) = &fields.description {
            query.push(", description = ");
            query.push_bind(description.clone());
        }
        if let Some(duration) = fields.duration {
            query.push(", duration = ");
            query.push_bind(duration);
        }
        if let Some(genre) = &fields.genre {
            query.push(", genre = ");
            query.push_bind(genre.clone());
        }
        if let Some(tags) = &fields.tags {
            query.push(", tags = ");
            query.push_bind(tags.clone());
        }
        if let Some(thumbnail_url) = &fields.thumbnail_url {
            query.push(", thumbnail_url = ");
            query.push_bind(thumbnail_url.clone());
        }
        if let Some(video_url) = &fields.video_url {
            query.push(", video_url = ");
            query.push_bind(video_url.clone());
        }

        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" AND user_id = ");
        query.push_bind(owner_id);
        query.push(" RETURNING ");
        query.push(VIDEO_COLUMNS);

        let video = query
            .build_query_as::<Video>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(video)
    }

    /// Delete a video, scoped to its owner; returns false when not found
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM videos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List one page of an owner's videos plus the total matching count
    ///
    /// Filters are a conjunction of exact genre, tag overlap, and
    /// case-insensitive substring search over title or description.
    /// Ordering is newest first with the id as tiebreaker, which keeps
    /// pagination stable. The page and count queries run concurrently.
    pub async fn list(&self, owner_id: Uuid, filter: &VideoFilter) -> Result<(Vec<Video>, i64)> {
        let offset = i64::from(filter.page - 1) * i64::from(filter.limit);

        let mut list_query =
            QueryBuilder::new(format!("SELECT {} FROM videos", VIDEO_COLUMNS));
        push_filter_clauses(&mut list_query, owner_id, filter);
        list_query.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        list_query.push_bind(i64::from(filter.limit));
        list_query.push(" OFFSET ");
        list_query.push_bind(offset);

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM videos");
        push_filter_clauses(&mut count_query, owner_id, filter);

        let (videos, total) = tokio::try_join!(
            list_query.build_query_as::<Video>().fetch_all(&self.pool),
            count_query
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool),
        )?;

        Ok((videos, total))
    }
}

/// Append the owner scope and optional filter conjuncts to a query
fn push_filter_clauses(
    query: &mut QueryBuilder<'_, Postgres>,
    owner_id: Uuid,
    filter: &VideoFilter,
) {
    query.push(" WHERE user_id = ");
    query.push_bind(owner_id);

    if let Some(genre) = &filter.genre {
        query.push(" AND genre = ");
        query.push_bind(genre.clone());
    }

    if !filter.tags.is_empty() {
        query.push(" AND tags && ");
        query.push_bind(filter.tags.clone());
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        query.push(" AND (title ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR description ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(genre: Option<&str>, tags: &[&str], search: Option<&str>) -> VideoFilter {
        VideoFilter {
            genre: genre.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            search: search.map(str::to_string),
            page: 1,
            limit: 10,
        }
    }

    #[test]
    fn test_owner_scope_always_present() {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM videos");
        push_filter_clauses(&mut query, Uuid::new_v4(), &filter(None, &[], None));
        assert_eq!(query.sql(), "SELECT COUNT(*) FROM videos WHERE user_id = $1");
    }

    #[test]
    fn test_all_filters_are_conjoined() {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM videos");
        push_filter_clauses(
            &mut query,
            Uuid::new_v4(),
            &filter(Some("Tutorial"), &["rust"], Some("intro")),
        );
        assert_eq!(
            query.sql(),
            "SELECT COUNT(*) FROM videos WHERE user_id = $1 AND genre = $2 \
             AND tags && $3 AND (title ILIKE $4 OR description ILIKE $5)"
        );
    }

    #[test]
    fn test_empty_tags_add_no_clause() {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM videos");
        push_filter_clauses(&mut query, Uuid::new_v4(), &filter(Some("Music"), &[], None));
        assert!(!query.sql().contains("tags"));
    }
}
