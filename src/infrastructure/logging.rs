use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::{DomainError, ErrorKind};

pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }

    tracing::info!("Logging initialized with level: {}", config.level);
}

/// Terminal outcome of one file retrieval request
#[derive(Debug, Clone)]
pub struct FileRetrievalEvent {
    /// Path as requested by the client
    pub requested_path: String,
    /// Token prefix of the calling key, if one was presented
    pub caller: Option<String>,
    pub client_ip: Option<String>,
    /// `None` on success
    pub error: Option<RetrievalFailure>,
}

/// Outcome label for requests rejected before a key was accepted
pub const UNAUTHENTICATED: &str = "unauthenticated";

/// Failure detail carried by a [`FileRetrievalEvent`]; server-side only
#[derive(Debug, Clone)]
pub struct RetrievalFailure {
    /// Metric and log label: an error kind or [`UNAUTHENTICATED`]
    pub outcome: &'static str,
    pub internal: bool,
    pub detail: String,
}

impl From<&DomainError> for RetrievalFailure {
    fn from(err: &DomainError) -> Self {
        Self {
            outcome: err.kind().as_str(),
            internal: err.kind() == ErrorKind::Internal,
            detail: err.message().to_string(),
        }
    }
}

impl FileRetrievalEvent {
    pub fn new(requested_path: impl Into<String>) -> Self {
        Self {
            requested_path: requested_path.into(),
            caller: None,
            client_ip: None,
            error: None,
        }
    }

    pub fn with_caller(mut self, caller: Option<String>) -> Self {
        self.caller = caller;
        self
    }

    pub fn with_client_ip(mut self, client_ip: Option<String>) -> Self {
        self.client_ip = client_ip;
        self
    }

    pub fn failed(mut self, err: &DomainError) -> Self {
        self.error = Some(err.into());
        self
    }

    /// Request carried no key, or one that lacks the `read` permission
    pub fn unauthenticated(mut self) -> Self {
        self.error = Some(RetrievalFailure {
            outcome: UNAUTHENTICATED,
            internal: false,
            detail: "missing, unknown or under-scoped API key".to_string(),
        });
        self
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// `success`, or the failure's label
    pub fn outcome(&self) -> &'static str {
        self.error.as_ref().map_or("success", |failure| failure.outcome)
    }

    /// Emit the event; internal failures log at error, client errors at warn
    pub fn log(&self) {
        let caller = self.caller.as_deref().unwrap_or("-");
        let client_ip = self.client_ip.as_deref().unwrap_or("-");

        match &self.error {
            None => tracing::info!(
                file_path = %self.requested_path,
                caller = %caller,
                client_ip = %client_ip,
                success = true,
                "File retrieval"
            ),
            Some(failure) if failure.internal => tracing::error!(
                file_path = %self.requested_path,
                caller = %caller,
                client_ip = %client_ip,
                success = false,
                error_kind = %failure.outcome,
                error = %failure.detail,
                "File retrieval error"
            ),
            Some(failure) => tracing::warn!(
                file_path = %self.requested_path,
                caller = %caller,
                client_ip = %client_ip,
                success = false,
                error_kind = %failure.outcome,
                error = %failure.detail,
                "File retrieval error"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_event() {
        let event = FileRetrievalEvent::new("/test/file.txt")
            .with_caller(Some("fk_live_abcd".to_string()))
            .with_client_ip(Some("127.0.0.1".to_string()));

        assert!(event.success());
        assert_eq!(event.outcome(), "success");
        assert_eq!(event.caller.as_deref(), Some("fk_live_abcd"));
        assert_eq!(event.client_ip.as_deref(), Some("127.0.0.1"));
        event.log();
    }

    #[test]
    fn test_failed_event_carries_kind_and_detail() {
        let err = DomainError::file_not_found("'/srv/cdn/missing.txt' does not exist");
        let event = FileRetrievalEvent::new("missing.txt").failed(&err);

        assert!(!event.success());
        assert_eq!(event.outcome(), "file_not_found");
        let failure = event.error.as_ref().unwrap();
        assert!(!failure.internal);
        assert!(failure.detail.contains("does not exist"));
        event.log();
    }

    #[test]
    fn test_internal_failure_is_flagged() {
        let event = FileRetrievalEvent::new("a.txt").failed(&DomainError::internal("disk gone"));

        assert_eq!(event.outcome(), "internal");
        assert!(event.error.as_ref().unwrap().internal);
    }

    #[test]
    fn test_unauthenticated_event_has_no_caller() {
        let event = FileRetrievalEvent::new("test/file.txt")
            .with_client_ip(Some("203.0.113.7".to_string()))
            .unauthenticated();

        assert!(!event.success());
        assert!(event.caller.is_none());
        assert_eq!(event.outcome(), UNAUTHENTICATED);
        event.log();
    }
}
