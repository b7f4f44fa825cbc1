//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth,
    cache::{self, LISTING_TTL_SECONDS},
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{AuthResponse, LoginRequest, RegisterRequest},
    models::video::{
        NewVideo, PaginatedVideos, Pagination, UpdateVideo, VideoFilter, VideoListQuery,
    },
    state::AppState,
    validation,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/videos", get(list_videos).post(create_video))
        .route(
            "/videos/:id",
            get(get_video).put(update_video).delete(delete_video),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    common::database::health_check(&state.db_pool).await?;

    Ok(Json(json!({
        "status": "ok",
        "service": "clipshelf-api"
    })))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_register(&payload.email, &payload.password)?;

    let existing = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::Internal
        })?;

    if existing.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = auth::hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::Internal
    })?;
    let api_key = auth::generate_api_key();

    let user = match state
        .user_repository
        .create(
            &payload.email,
            &password_hash,
            payload.name.as_deref(),
            &api_key,
        )
        .await
    {
        Ok(user) => user,
        Err(e) => {
            // Lost a registration race: the unique constraint fired after
            // the pre-check passed
            if e.downcast_ref::<sqlx::Error>()
                .is_some_and(common::error::is_unique_violation)
            {
                return Err(ApiError::Conflict("User already exists".to_string()));
            }
            error!("Failed to create user: {}", e);
            return Err(ApiError::Internal);
        }
    };

    let token = state
        .jwt_service
        .issue_token(user.id, &user.email)
        .map_err(|e| {
            error!("Failed to issue token: {}", e);
            ApiError::Internal
        })?;

    info!("Registered user: {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: user.into(),
            token,
        }),
    ))
}

/// Log a user in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::InvalidCredentials)?;

    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state
        .jwt_service
        .issue_token(user.id, &user.email)
        .map_err(|e| {
            error!("Failed to issue token: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: user.into(),
        token,
    }))
}

/// List the caller's videos with filtering and pagination
pub async fn list_videos(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<VideoListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = VideoFilter::from_query(params);
    let cache_key = cache::listing_key(user.id, &filter);

    if let Some(cached) = state.cache.get::<PaginatedVideos>(&cache_key).await {
        return Ok(Json(cached));
    }

    let (videos, total) = state
        .video_repository
        .list(user.id, &filter)
        .await
        .map_err(|e| {
            error!("Failed to list videos: {}", e);
            ApiError::Internal
        })?;

    let response = PaginatedVideos {
        data: videos,
        pagination: Pagination::new(filter.page, filter.limit, total),
    };

    state
        .cache
        .set(&cache_key, &response, LISTING_TTL_SECONDS)
        .await;

    Ok(Json(response))
}

/// Create a new video owned by the caller
pub async fn create_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewVideo>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_new_video(&payload)?;

    let video = state
        .video_repository
        .create(user.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create video: {}", e);
            ApiError::Internal
        })?;

    state.cache.invalidate_listings(user.id).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Video created successfully",
            "video": video,
        })),
    ))
}

/// Get a single video by ID
pub async fn get_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let video = state
        .video_repository
        .get(user.id, id)
        .await
        .map_err(|e| {
            error!("Failed to get video: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("Video"))?;

    Ok(Json(json!({ "video": video })))
}

/// Apply a partial update to a video
pub async fn update_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVideo>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_update_video(&payload)?;

    let video = state
        .video_repository
        .update(user.id, id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update video: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("Video"))?;

    state.cache.invalidate_listings(user.id).await;

    Ok(Json(json!({
        "message": "Video updated successfully",
        "video": video,
    })))
}

/// Delete a video
pub async fn delete_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .video_repository
        .delete(user.id, id)
        .await
        .map_err(|e| {
            error!("Failed to delete video: {}", e);
            ApiError::Internal
        })?;

    if !deleted {
        return Err(ApiError::NotFound("Video"));
    }

    state.cache.invalidate_listings(user.id).await;

    Ok(Json(json!({
        "message": "Video deleted successfully",
    })))
}
