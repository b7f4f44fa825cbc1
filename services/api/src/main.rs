use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod auth;
mod cache;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, init_pool},
};

use crate::{
    auth::{JwtConfig, JwtService},
    cache::CacheService,
    repositories::{UserRepository, video::VideoRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting clipshelf API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize Redis connection pool
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(&jwt_config);

    // Initialize repositories and cache
    let user_repository = UserRepository::new(pool.clone());
    let video_repository = VideoRepository::new(pool.clone());
    let cache = CacheService::new(redis_pool);

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        video_repository,
        jwt_service,
        cache,
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("API service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
