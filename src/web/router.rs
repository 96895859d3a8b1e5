//! Router configuration for the ephemail Web API.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_mailbox, delete_mailbox, get_mailbox, ingest_message, list_emails, mark_email_read,
    AppState,
};
use super::middleware::{create_cors_layer, origin_guard};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/mailboxes", post(create_mailbox))
        .route(
            "/mailboxes/:address",
            get(get_mailbox).delete(delete_mailbox),
        )
        .route("/mailboxes/:address/emails", get(list_emails))
        .route("/emails/:id/read", post(mark_email_read))
        .route("/inbound", post(ingest_message));

    let allowed = Arc::new(allowed_origins.to_vec());

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(allowed_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let allowed = allowed.clone();
                    origin_guard(allowed, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
        // Should not panic
    }
}
