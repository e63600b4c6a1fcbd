//! Application configuration

mod app_config;

pub use self::app_config::{
    AppConfig, AuthConfig, FilesConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
    TraversalStatus,
};
