//! File delivery endpoint

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, Request, State},
    response::Response,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::api::middleware::{ClientIp, FileRead, RequireScope};
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::DomainError;
use crate::infrastructure::logging::FileRetrievalEvent;
use crate::infrastructure::observability::record_file_retrieval;

/// GET /files/{*path}
///
/// The key check runs before any path handling, so an unauthenticated
/// traversal attempt is answered 401 and never reaches the guard. Every
/// outcome, rejections included, emits one retrieval event.
pub async fn get_file(
    State(state): State<AppState>,
    auth: Result<RequireScope<FileRead>, ApiError>,
    ClientIp(client_ip): ClientIp,
    path: Result<Path<String>, PathRejection>,
    request: Request,
) -> Result<Response, ApiError> {
    let requested = match &path {
        Ok(Path(requested)) => requested.clone(),
        Err(_) => request.uri().path().to_string(),
    };

    let event = FileRetrievalEvent::new(requested.as_str()).with_client_ip(client_ip);

    let auth = match auth {
        Ok(auth) => auth,
        Err(rejection) => {
            finish(event.unauthenticated());
            return Err(rejection);
        }
    };

    let event = event.with_caller(Some(auth.key_prefix().to_string()));

    if path.is_err() {
        let err = DomainError::invalid_argument("Invalid path encoding");
        finish(event.failed(&err));
        return Err(ApiError::from_domain(&err, state.traversal_status));
    }

    let resolved = match state.path_guard.resolve(&requested).await {
        Ok(resolved) => resolved,
        Err(err) => {
            finish(event.failed(&err));
            return Err(ApiError::from_domain(&err, state.traversal_status));
        }
    };

    finish(event);

    let mime = mime_guess::from_path(&resolved).first_or_octet_stream();

    match ServeFile::new_with_mime(&resolved, &mime).oneshot(request).await {
        Ok(response) => Ok(response.map(Body::new)),
        Err(never) => match never {},
    }
}

fn finish(event: FileRetrievalEvent) {
    record_file_retrieval(event.outcome());
    event.log();
}
