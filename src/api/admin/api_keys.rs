//! API key management admin endpoints

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{Admin, RequireScope};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::token_prefix;
use crate::domain::ApiKey;

/// Request to issue a new API key
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApiKeyRequest {
    pub permissions: Vec<String>,
}

/// Request to revoke an API key
#[derive(Debug, Clone, Deserialize)]
pub struct RevokeApiKeyRequest {
    pub key: String,
}

/// API key response for admin API; never carries the full token
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyResponse {
    pub key_prefix: String,
    pub permissions: Vec<String>,
    pub created_at: String,
    pub last_used_at: Option<String>,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            key_prefix: key.token_prefix().to_string(),
            permissions: key.permissions().iter().map(String::from).collect(),
            created_at: key.created_at().to_rfc3339(),
            last_used_at: key.last_used_at().map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Issued key; the only response that contains the token
#[derive(Debug, Clone, Serialize)]
pub struct IssuedApiKeyResponse {
    pub key: String,
    pub key_prefix: String,
    pub permissions: Vec<String>,
}

impl From<&ApiKey> for IssuedApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            key: key.token().to_string(),
            key_prefix: key.token_prefix().to_string(),
            permissions: key.permissions().iter().map(String::from).collect(),
        }
    }
}

/// List API keys response
#[derive(Debug, Clone, Serialize)]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: usize,
}

/// GET /admin/api-keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    _auth: RequireScope<Admin>,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    debug!("Admin listing all API keys");

    let keys = state.api_key_service.list().await.map_err(ApiError::from)?;
    let api_keys: Vec<ApiKeyResponse> = keys.iter().map(ApiKeyResponse::from).collect();
    let total = api_keys.len();

    Ok(Json(ListApiKeysResponse { api_keys, total }))
}

/// POST /admin/api-keys
pub async fn create_api_key(
    State(state): State<AppState>,
    auth: RequireScope<Admin>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<IssuedApiKeyResponse>), ApiError> {
    debug!(issued_by = %auth.key_prefix(), "Admin issuing API key");

    let api_key = state
        .api_key_service
        .issue(request.permissions)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(IssuedApiKeyResponse::from(&api_key))))
}

/// POST /admin/api-keys/revoke
pub async fn revoke_api_key(
    State(state): State<AppState>,
    auth: RequireScope<Admin>,
    Json(request): Json<RevokeApiKeyRequest>,
) -> Result<StatusCode, ApiError> {
    debug!(
        revoked_by = %auth.key_prefix(),
        key_prefix = %token_prefix(request.key.trim()),
        "Admin revoking API key"
    );

    state
        .api_key_service
        .revoke(request.key.trim())
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
