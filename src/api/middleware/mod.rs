//! API middleware components

pub mod auth;
pub mod client_ip;
pub mod logging;
pub mod metrics;
pub mod security;

pub use auth::{Admin, FileRead, RequireScope, Scope};
pub use client_ip::ClientIp;
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use security::{security_headers_middleware, MAX_BODY_SIZE};
