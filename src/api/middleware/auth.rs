//! API key authentication middleware

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::{token_prefix, PermissionSet};

/// Permission scope a route requires
pub trait Scope: Send + Sync + 'static {
    /// Every label here must be granted to the calling key
    const REQUIRED: &'static [&'static str];
}

/// Read access to files under the served root
#[derive(Debug, Clone, Copy)]
pub struct FileRead;

impl Scope for FileRead {
    const REQUIRED: &'static [&'static str] = &["read"];
}

/// Key management
#[derive(Debug, Clone, Copy)]
pub struct Admin;

impl Scope for Admin {
    const REQUIRED: &'static [&'static str] = &["admin"];
}

/// Extractor that requires an API key granting scope `S`
///
/// Extracts the API key from either:
/// - Authorization header: `Bearer <api_key>`
/// - X-API-Key header: `<api_key>`
///
/// A missing, unknown, revoked or insufficiently scoped key is rejected with
/// 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct RequireScope<S: Scope> {
    key_prefix: String,
    _scope: PhantomData<S>,
}

impl<S: Scope> RequireScope<S> {
    /// Loggable prefix of the caller's token
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }
}

impl<S: Scope> FromRequestParts<AppState> for RequireScope<S> {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_api_key_from_headers(&parts.headers) else {
            debug!(path = %parts.uri.path(), "Request without API key");
            return Err(ApiError::unauthorized());
        };

        let required = PermissionSet::from_static(S::REQUIRED);

        if !state.api_key_service.validate(&token, &required).await {
            debug!(
                key_prefix = %token_prefix(&token),
                required = ?S::REQUIRED,
                "API key rejected"
            );
            return Err(ApiError::unauthorized());
        }

        Ok(Self {
            key_prefix: token_prefix(&token).to_string(),
            _scope: PhantomData,
        })
    }
}

fn extract_api_key_from_headers(headers: &HeaderMap) -> Option<String> {
    // Try Authorization header first (Bearer token)
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
