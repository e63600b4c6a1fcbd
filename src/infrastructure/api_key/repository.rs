//! In-memory API key repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::api_key::{token_prefix, ApiKey, ApiKeyRepository, PermissionSet};
use crate::domain::DomainError;

/// Keys plus their issuance order, guarded together by one lock
#[derive(Debug, Default)]
struct KeyTable {
    keys: HashMap<String, ApiKey>,
    order: Vec<String>,
    /// Revoked tokens; never accepted again
    retired: HashSet<String>,
}

/// In-memory implementation of ApiKeyRepository
///
/// All state sits behind a single `RwLock`, so every insert, removal and
/// usage stamp is atomic with respect to other callers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApiKeyRepository {
    table: Arc<RwLock<KeyTable>>,
}

impl InMemoryApiKeyRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut table = self.table.write().await;
        let token = api_key.token().to_string();

        if table.keys.contains_key(&token) {
            return Err(DomainError::invalid_argument(format!(
                "API key '{}' already exists",
                token_prefix(&token)
            )));
        }

        if table.retired.contains(&token) {
            return Err(DomainError::invalid_argument(format!(
                "API key '{}' was revoked and cannot be reissued",
                token_prefix(&token)
            )));
        }

        table.order.push(token.clone());
        table.keys.insert(token, api_key.clone());

        Ok(api_key)
    }

    async fn record_usage_if_allowed(
        &self,
        token: &str,
        required: &PermissionSet,
        at: DateTime<Utc>,
    ) -> Result<Option<ApiKey>, DomainError> {
        let mut table = self.table.write().await;

        match table.keys.get_mut(token) {
            Some(key) if key.allows(required) => {
                key.record_usage(at);
                Ok(Some(key.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, token: &str) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;

        if table.keys.remove(token).is_some() {
            table.order.retain(|t| t != token);
            table.retired.insert(token.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        let table = self.table.read().await;

        let result = table
            .order
            .iter()
            .filter_map(|token| table.keys.get(token))
            .cloned()
            .collect();

        Ok(result)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let table = self.table.read().await;
        Ok(table.keys.len())
    }
}
