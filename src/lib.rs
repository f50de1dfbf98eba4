pub mod config;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;
pub mod store;
pub mod submission;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::notify::telegram::TelegramNotifier;
use crate::notify::Notifier;
use crate::state::{AppState, SharedState};
use crate::store::SubmissionStore;

pub fn build_app(config: Config) -> Router {
    if config.telegram.is_none() {
        tracing::warn!("Telegram not configured; mandatory confirmations will fail");
    }
    let notifier = Arc::new(TelegramNotifier::new(config.telegram.clone()));
    build_app_with_notifier(config, notifier)
}

/// Like [`build_app`] with a caller-supplied notifier.
pub fn build_app_with_notifier(config: Config, notifier: Arc<dyn Notifier>) -> Router {
    let max_body_size = config.max_body_size;
    let routes = routes::api_routes(&config.cors_origin);

    let state: SharedState = Arc::new(AppState {
        store: SubmissionStore::new(config.data_file.clone()),
        notifier,
        config,
    });

    routes
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
