use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use console_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::ServerSettings;
use crate::handlers::{
    admin::{
        add_role_popover, grant_role_handler, profile_page, revoke_role_handler, search_page,
        users_redirect,
    },
    app::{health_check, index},
    metrics::metrics,
    moderator::articles_page,
};
use crate::AppState;

pub fn build_router(state: AppState, server: &ServerSettings) -> Router {
    // Per-browser view state
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            server.session_inactivity_hours,
        )));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/admin/users", get(users_redirect))
        .route("/admin/users/", get(search_page))
        .route("/admin/users/:tag", get(profile_page))
        .route("/admin/users/:tag/add-role", post(add_role_popover))
        .route(
            "/admin/users/:tag/roles/:role",
            post(grant_role_handler).delete(revoke_role_handler),
        )
        .route("/moderator/articles/:article_ref", get(articles_page))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost so the span above sees the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
