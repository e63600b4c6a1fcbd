//! Infrastructure layer - Filesystem, storage and observability implementations

pub mod api_key;
pub mod file_access;
pub mod logging;
pub mod observability;
