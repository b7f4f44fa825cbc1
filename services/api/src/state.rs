//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    auth::JwtService,
    cache::CacheService,
    repositories::{UserRepository, video::VideoRepository},
};

/// Application state shared across handlers
///
/// Constructed once at startup and cloned by reference into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub video_repository: VideoRepository,
    pub jwt_service: JwtService,
    pub cache: CacheService,
}
