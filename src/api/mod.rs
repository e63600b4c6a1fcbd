//! API layer - HTTP endpoints and middleware

pub mod admin;
pub mod files;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub use middleware::{Admin, FileRead, RequireScope};
pub use router::{create_router_with_metrics, create_router_with_state};
pub use state::AppState;
