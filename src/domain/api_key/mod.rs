//! API Key domain
//!
//! This module provides domain types and traits for API key management:
//! the key entity, permission sets and the storage contract.

mod entity;
mod repository;
mod validation;

pub use entity::{token_prefix, ApiKey, PermissionSet, TOKEN_DISPLAY_PREFIX_LEN};
#[cfg(test)]
pub use repository::MockApiKeyRepository;
pub use repository::ApiKeyRepository;
pub use validation::{validate_permission, validate_token, ApiKeyValidationError};
