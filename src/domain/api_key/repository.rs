//! API Key repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

use super::entity::{ApiKey, PermissionSet};
use crate::domain::DomainError;

/// Repository trait for API key storage
///
/// Implementations must apply every mutation atomically with respect to
/// concurrent readers and writers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Insert a new API key; fails if the token is live or was ever revoked
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Stamp `last_used_at` on the key if it grants every required permission
    ///
    /// Returns the updated key, or `None` when the token is unknown or lacks a
    /// permission. Nothing is written in the `None` case.
    async fn record_usage_if_allowed(
        &self,
        token: &str,
        required: &PermissionSet,
        at: DateTime<Utc>,
    ) -> Result<Option<ApiKey>, DomainError>;

    /// Remove an API key and retire its token, returning whether it existed
    async fn delete(&self, token: &str) -> Result<bool, DomainError>;

    /// List all live API keys in issuance order
    async fn list(&self) -> Result<Vec<ApiKey>, DomainError>;

    /// Count live API keys
    async fn count(&self) -> Result<usize, DomainError>;
}
