//! Application state for shared services

use std::sync::Arc;

use crate::config::TraversalStatus;
use crate::domain::api_key::{ApiKeyRepository, PermissionSet};
use crate::domain::{ApiKey, DomainError};
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::file_access::PathGuard;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<dyn ApiKeyServiceTrait>,
    pub path_guard: Arc<PathGuard>,
    pub traversal_status: TraversalStatus,
}

impl AppState {
    pub fn new(
        api_key_service: Arc<dyn ApiKeyServiceTrait>,
        path_guard: Arc<PathGuard>,
    ) -> Self {
        Self {
            api_key_service,
            path_guard,
            traversal_status: TraversalStatus::default(),
        }
    }

    pub fn with_traversal_status(mut self, traversal_status: TraversalStatus) -> Self {
        self.traversal_status = traversal_status;
        self
    }
}

/// Trait for API key service operations
#[async_trait::async_trait]
pub trait ApiKeyServiceTrait: Send + Sync {
    /// Issue a key; the returned entity carries the token and normalized permissions
    async fn issue(&self, permissions: Vec<String>) -> Result<ApiKey, DomainError>;
    async fn validate(&self, token: &str, required: &PermissionSet) -> bool;
    async fn revoke(&self, token: &str) -> Result<(), DomainError>;
    async fn list(&self) -> Result<Vec<ApiKey>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
impl<R: ApiKeyRepository + 'static> ApiKeyServiceTrait for ApiKeyService<R> {
    async fn issue(&self, permissions: Vec<String>) -> Result<ApiKey, DomainError> {
        ApiKeyService::issue_key(self, permissions).await
    }

    async fn validate(&self, token: &str, required: &PermissionSet) -> bool {
        ApiKeyService::validate(self, token, required).await
    }

    async fn revoke(&self, token: &str) -> Result<(), DomainError> {
        ApiKeyService::revoke(self, token).await
    }

    async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list(self).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        ApiKeyService::count(self).await
    }
}
