//! Middleware for the ephemail Web API.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::error::ApiError;

/// Build the CORS layer.
///
/// With no configured origins the API is open; otherwise only the listed
/// origins are reflected.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers(Any)
    }
}

/// Coarse origin check.
///
/// Requests carrying an Origin header outside the allowed list get 403.
/// Requests without the header (the mail transport, curl) pass; this is a
/// browser gate, not authentication.
pub async fn origin_guard(allowed: Arc<Vec<String>>, request: Request, next: Next) -> Response {
    if allowed.is_empty() {
        return next.run(request).await;
    }

    match request.headers().get(header::ORIGIN) {
        None => next.run(request).await,
        Some(origin) => {
            let permitted = origin
                .to_str()
                .map(|o| allowed.iter().any(|a| a == o))
                .unwrap_or(false);

            if permitted {
                next.run(request).await
            } else {
                tracing::warn!(origin = ?origin, "request from disallowed origin");
                ApiError::forbidden("origin not allowed").into_response()
            }
        }
    }
}
