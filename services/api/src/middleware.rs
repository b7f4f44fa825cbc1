//! Authentication middleware resolving request identity
//!
//! Identity is resolved through an ordered list of strategies evaluated
//! short-circuit: a bearer token is tried first, then the x-api-key header.
//! Both failing yields 401 without disclosing which credential was bad; a
//! storage failure during API-key lookup is a server error, not an
//! authentication failure.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Name of the API key header
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticated identity for the duration of one request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Resolve the request identity and stash it in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = resolve_identity(&state, req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    if let Some(user) = bearer_identity(state, headers) {
        return Ok(user);
    }

    if let Some(user) = api_key_identity(state, headers).await? {
        return Ok(user);
    }

    Err(ApiError::Unauthorized)
}

/// First strategy: a bearer token in the Authorization header
fn bearer_identity(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    let token = bearer_token(headers)?;
    let claims = state.jwt_service.verify_token(token)?;
    Some(AuthUser {
        id: claims.sub,
        email: claims.email,
    })
}

/// Second strategy: an exact API key match against the credential store
async fn api_key_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<AuthUser>, ApiError> {
    let Some(api_key) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) else {
        return Ok(None);
    };

    let user = state
        .user_repository
        .find_by_api_key(api_key)
        .await
        .map_err(|e| {
            error!("API key lookup failed: {}", e);
            ApiError::Internal
        })?;

    Ok(user.map(|u| AuthUser {
        id: u.id,
        email: u.email,
    }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
