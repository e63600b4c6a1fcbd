//! API Key service
//!
//! The key authority: issues, validates and revokes API keys.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::api_key::{
    token_prefix, validate_token, ApiKey, ApiKeyRepository, ApiKeyValidationError,
    PermissionSet,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_key_validation;

use super::generator::ApiKeyGenerator;

/// API Key service for managing API keys
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    generator: ApiKeyGenerator,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    /// Create a new API key service
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::production(),
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Issue a new API key holding `permissions`
    ///
    /// Returns the token. This is the only time it is handed out.
    pub async fn issue<I, S>(&self, permissions: I) -> Result<String, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let api_key = self.issue_key(permissions).await?;
        Ok(api_key.token().to_string())
    }

    /// Issue a new API key and return it with its normalized permissions
    pub async fn issue_key<I, S>(&self, permissions: I) -> Result<ApiKey, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let permissions = parse_granted(permissions)?;
        let token = self.generator.generate();

        self.insert(token, permissions).await
    }

    /// Issue an API key with a known token (bootstrap keys, tests)
    ///
    /// A token that was revoked earlier is refused with `InvalidArgument`;
    /// revocation is final even for caller-chosen tokens.
    pub async fn issue_with_token<I, S>(
        &self,
        token: &str,
        permissions: I,
    ) -> Result<String, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_token(token)?;
        let permissions = parse_granted(permissions)?;

        let api_key = self.insert(token.to_string(), permissions).await?;
        Ok(api_key.token().to_string())
    }

    async fn insert(&self, token: String, permissions: PermissionSet) -> Result<ApiKey, DomainError> {
        let api_key = ApiKey::new(token, permissions);
        let created = self.repository.create(api_key).await?;

        info!(
            key_prefix = %created.token_prefix(),
            permissions = ?created.permissions(),
            "API key issued"
        );

        Ok(created)
    }

    /// Check that `token` is live and grants every permission in `required`
    ///
    /// Stamps `last_used_at` on success only. Never errors: a store failure
    /// is logged and treated as a failed validation.
    pub async fn validate(&self, token: &str, required: &PermissionSet) -> bool {
        if token.trim().is_empty() {
            record_key_validation(false);
            return false;
        }

        let result = self
            .repository
            .record_usage_if_allowed(token, required, Utc::now())
            .await;

        let valid = match result {
            Ok(Some(_)) => true,
            Ok(None) => {
                debug!(key_prefix = %token_prefix(token), "API key validation failed");
                false
            }
            Err(e) => {
                warn!(
                    key_prefix = %token_prefix(token),
                    error = %e,
                    "API key store failed during validation"
                );
                false
            }
        };

        record_key_validation(valid);
        valid
    }

    /// Revoke an API key; it can never validate again
    pub async fn revoke(&self, token: &str) -> Result<(), DomainError> {
        if !self.repository.delete(token).await? {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                token_prefix(token)
            )));
        }

        info!(key_prefix = %token_prefix(token), "API key revoked");
        Ok(())
    }

    /// List all live API keys in issuance order
    pub async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list().await
    }

    /// Count live API keys
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

fn parse_granted<I, S>(permissions: I) -> Result<PermissionSet, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let permissions = PermissionSet::parse(permissions)?;

    if permissions.is_empty() {
        return Err(ApiKeyValidationError::NoPermissions.into());
    }

    Ok(permissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::MockApiKeyRepository;
    use crate::domain::ErrorKind;
    use crate::infrastructure::api_key::InMemoryApiKeyRepository;

    fn create_service() -> ApiKeyService<InMemoryApiKeyRepository> {
        let repo = Arc::new(InMemoryApiKeyRepository::new());
        ApiKeyService::new(repo).with_generator(ApiKeyGenerator::test())
    }

    fn perms(labels: &[&str]) -> PermissionSet {
        PermissionSet::parse(labels).unwrap()
    }

    #[tokio::test]
    async fn test_issue_and_validate_round_trip() {
        let service = create_service();

        let token = service.issue(["read"]).await.unwrap();
        assert!(token.starts_with("fk_test_"));

        assert!(service.validate(&token, &PermissionSet::new()).await);
        assert!(service.validate(&token, &perms(&["read"])).await);
        assert!(!service.validate(&token, &perms(&["write"])).await);
    }

    #[tokio::test]
    async fn test_issue_requires_permissions() {
        let service = create_service();

        let err = service.issue(Vec::<String>::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = service.issue([" "]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validate_rejects_blank_and_unknown() {
        let service = create_service();
        service.issue(["read"]).await.unwrap();

        assert!(!service.validate("", &PermissionSet::new()).await);
        assert!(!service.validate("   ", &PermissionSet::new()).await);
        assert!(!service.validate("fk_test_unknown", &PermissionSet::new()).await);
    }

    #[tokio::test]
    async fn test_validate_updates_last_used_only_on_success() {
        let service = create_service();
        let token = service.issue(["read"]).await.unwrap();

        assert!(!service.validate(&token, &perms(&["write"])).await);
        assert!(!service.validate("wrong-token", &perms(&["read"])).await);
        let keys = service.list().await.unwrap();
        assert!(keys[0].last_used_at().is_none());

        assert!(service.validate(&token, &perms(&["read"])).await);
        let keys = service.list().await.unwrap();
        let first_use = keys[0].last_used_at().unwrap();

        assert!(!service.validate(&token, &perms(&["admin"])).await);
        let keys = service.list().await.unwrap();
        assert_eq!(keys[0].last_used_at(), Some(first_use));
    }

    #[tokio::test]
    async fn test_revoke_is_final() {
        let service = create_service();
        let token = service.issue(["read", "write"]).await.unwrap();

        assert!(service.validate(&token, &perms(&["read"])).await);

        service.revoke(&token).await.unwrap();
        assert!(!service.validate(&token, &perms(&["read"])).await);
        assert!(!service.validate(&token, &PermissionSet::new()).await);

        let err = service.revoke(&token).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_revoke_unknown_token() {
        let service = create_service();
        let err = service.revoke("never-issued").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_issue_with_token() {
        let service = create_service();

        let token = service
            .issue_with_token("test-api-key", ["read"])
            .await
            .unwrap();
        assert_eq!(token, "test-api-key");
        assert!(service.validate("test-api-key", &perms(&["read"])).await);

        let err = service
            .issue_with_token("test-api-key", ["admin"])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = service.issue_with_token("", ["read"]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_revoked_token_cannot_be_reregistered() {
        let service = create_service();
        service
            .issue_with_token("bootstrap-admin", ["admin"])
            .await
            .unwrap();
        service.revoke("bootstrap-admin").await.unwrap();

        let err = service
            .issue_with_token("bootstrap-admin", ["admin"])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(!service.validate("bootstrap-admin", &perms(&["admin"])).await);
    }

    #[tokio::test]
    async fn test_issue_key_returns_normalized_permissions() {
        let service = create_service();

        let key = service.issue_key([" read", "write", "read "]).await.unwrap();

        let labels: Vec<&str> = key.permissions().iter().collect();
        assert_eq!(labels, vec!["read", "write"]);
        assert!(key.last_used_at().is_none());
        assert!(service.validate(key.token(), &perms(&["read", "write"])).await);
    }

    #[tokio::test]
    async fn test_list_in_issuance_order() {
        let service = create_service();

        let first = service.issue(["read"]).await.unwrap();
        let second = service.issue(["write"]).await.unwrap();
        let third = service.issue(["admin"]).await.unwrap();
        service.revoke(&second).await.unwrap();

        let tokens: Vec<String> = service
            .list()
            .await
            .unwrap()
            .iter()
            .map(|k| k.token().to_string())
            .collect();
        assert_eq!(tokens, vec![first, third]);
    }

    #[tokio::test]
    async fn test_concurrent_validation() {
        let service = Arc::new(create_service());
        let token = service.issue(["read"]).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let service = service.clone();
            let token = token.clone();
            handles.push(tokio::spawn(async move {
                service.validate(&token, &perms(&["read"])).await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let keys = service.list().await.unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].last_used_at().is_some());
    }

    #[tokio::test]
    async fn test_validate_fails_closed_on_store_error() {
        let mut repo = MockApiKeyRepository::new();
        repo.expect_record_usage_if_allowed()
            .returning(|_, _, _| Err(DomainError::internal("store unavailable")));

        let service = ApiKeyService::new(Arc::new(repo));
        assert!(!service.validate("some-token", &PermissionSet::new()).await);
    }

    #[tokio::test]
    async fn test_list_propagates_store_error() {
        let mut repo = MockApiKeyRepository::new();
        repo.expect_list()
            .returning(|| Err(DomainError::internal("store unavailable")));

        let service = ApiKeyService::new(Arc::new(repo));
        let err = service.list().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_blank_token_never_reaches_store() {
        let mut repo = MockApiKeyRepository::new();
        repo.expect_record_usage_if_allowed().never();

        let service = ApiKeyService::new(Arc::new(repo));
        assert!(!service.validate("", &PermissionSet::new()).await);
    }
}
