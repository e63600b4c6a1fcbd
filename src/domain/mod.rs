//! Domain layer - Core access-control rules and entities

pub mod api_key;
pub mod error;
pub mod file_access;

pub use api_key::{ApiKey, ApiKeyRepository, ApiKeyValidationError, PermissionSet};
pub use error::{DomainError, ErrorKind};
