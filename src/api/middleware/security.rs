//! Security middleware for HTTP headers

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Maximum admin request body size (64 KiB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Middleware to add security headers to all responses
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let is_file_path = request.uri().path().starts_with("/files/");
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // Prevent MIME type sniffing
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    // Prevent clickjacking
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    // Served files never execute in the gateway's origin
    let csp = if is_file_path {
        "default-src 'none'; sandbox; frame-ancestors 'none'"
    } else {
        "default-src 'none'; frame-ancestors 'none'"
    };
    headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static(csp));

    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    // Authenticated content: shared caches must not keep it
    if !headers.contains_key(header::CACHE_CONTROL) {
        let cache_control = if is_file_path {
            "private, no-cache"
        } else {
            "no-store, no-cache, must-revalidate"
        };
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
    }

    response
}
