//! Server assembly and lifecycle.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    infrastructure::{channel::InMemoryChannelLayer, repository::InMemoryStore},
    ui::{
        handler::{
            chat_handler, create_notification, create_user, get_unseen_count, health_check,
            notification_handler,
        },
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Build the router for the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/users", post(create_user))
        .route("/api/users/{user_id}/notifications", post(create_notification))
        .route(
            "/api/users/{user_id}/notifications/unseen_count",
            get(get_unseen_count),
        )
        .route("/ws/chat", get(chat_handler))
        .route("/ws/notifications", get(notification_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until a shutdown signal arrives.
pub async fn run_server(config: ServerConfig) -> Result<(), std::io::Error> {
    let store = Arc::new(InMemoryStore::new());
    let channel = Arc::new(InMemoryChannelLayer::new());

    let state = Arc::new(AppState {
        users: store.clone(),
        messages: store.clone(),
        notifications: store,
        channel,
        poll_interval: config.poll_interval(),
    });

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
