//! PMP File Gateway
//!
//! Serves files from a configured root directory to callers holding an API
//! key with the `read` permission:
//! - Path confinement with symlink-aware resolution
//! - API key issuance, validation, revocation and listing
//! - Structured retrieval logging and Prometheus metrics

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{ApiKeyServiceTrait, AppState};
use infrastructure::api_key::{ApiKeyGenerator, ApiKeyService, InMemoryApiKeyRepository};
use infrastructure::file_access::PathGuard;
use tracing::info;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let path_guard = PathGuard::new(&config.files.root_dir)
        .map_err(|e| anyhow::anyhow!("Invalid files.root_dir: {}", e))?;

    info!(root = %path_guard.root().display(), "Serving files");

    let api_key_service = Arc::new(
        ApiKeyService::new(Arc::new(InMemoryApiKeyRepository::new()))
            .with_generator(ApiKeyGenerator::new(config.auth.key_prefix.clone())),
    );

    if let Some(admin_key) = &config.auth.admin_key {
        create_admin_api_key(api_key_service.as_ref(), admin_key).await?;
    }

    let api_key_service: Arc<dyn ApiKeyServiceTrait> = api_key_service;

    Ok(AppState::new(api_key_service, Arc::new(path_guard))
        .with_traversal_status(config.files.traversal_status))
}

/// Register the configured bootstrap key with the `admin` permission
async fn create_admin_api_key(
    service: &ApiKeyService<InMemoryApiKeyRepository>,
    admin_key: &str,
) -> anyhow::Result<()> {
    service
        .issue_with_token(admin_key.trim(), ["admin"])
        .await
        .map_err(|e| anyhow::anyhow!("Failed to register admin API key: {}", e))?;

    info!("Admin API key registered from configuration");
    Ok(())
}
