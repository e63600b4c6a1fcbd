//! HTTP request/response types

pub mod error;
pub mod json;

pub use error::{ApiError, ErrorCode, ErrorResponse};
pub use json::Json;
