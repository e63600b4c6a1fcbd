//! API Key validation utilities

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during API key validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("At least one permission is required")]
    NoPermissions,

    #[error("Permission label cannot be empty")]
    EmptyPermission,

    #[error("Permission label exceeds maximum length of {0} characters")]
    PermissionTooLong(usize),

    #[error("Permission label contains invalid character: '{0}'. Only alphanumeric characters and '-', '_', '.', ':' are allowed")]
    InvalidPermissionCharacter(char),

    #[error("API key cannot be empty")]
    EmptyToken,

    #[error("API key exceeds maximum length of {0} characters")]
    TokenTooLong(usize),

    #[error("API key must consist of printable ASCII characters without whitespace")]
    InvalidTokenCharacter,
}

impl From<ApiKeyValidationError> for DomainError {
    fn from(err: ApiKeyValidationError) -> Self {
        DomainError::invalid_argument(err.to_string())
    }
}

const MAX_PERMISSION_LENGTH: usize = 64;
const MAX_TOKEN_LENGTH: usize = 256;

/// Validate a single permission label
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only alphanumeric characters and `-`, `_`, `.`, `:`
pub fn validate_permission(label: &str) -> Result<(), ApiKeyValidationError> {
    if label.is_empty() {
        return Err(ApiKeyValidationError::EmptyPermission);
    }

    if label.chars().count() > MAX_PERMISSION_LENGTH {
        return Err(ApiKeyValidationError::PermissionTooLong(MAX_PERMISSION_LENGTH));
    }

    if let Some(c) = label
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
    {
        return Err(ApiKeyValidationError::InvalidPermissionCharacter(c));
    }

    Ok(())
}

/// Validate a caller-supplied API key token
pub fn validate_token(token: &str) -> Result<(), ApiKeyValidationError> {
    if token.trim().is_empty() {
        return Err(ApiKeyValidationError::EmptyToken);
    }

    if token.len() > MAX_TOKEN_LENGTH {
        return Err(ApiKeyValidationError::TokenTooLong(MAX_TOKEN_LENGTH));
    }

    if !token.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(ApiKeyValidationError::InvalidTokenCharacter);
    }

    Ok(())
}
