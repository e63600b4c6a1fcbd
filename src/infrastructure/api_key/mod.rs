//! API Key infrastructure implementations
//!
//! This module provides implementations for API key generation,
//! in-memory storage and the key authority service.

mod generator;
mod repository;
mod service;

pub use generator::{ApiKeyGenerator, KEY_BYTES};
pub use repository::InMemoryApiKeyRepository;
pub use service::ApiKeyService;
