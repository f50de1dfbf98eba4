pub mod health;
pub mod submissions;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::AppError;
use crate::state::SharedState;

/// CORS header set attached to every response of a route.
#[derive(Debug, Clone, Copy)]
pub struct CorsProfile {
    pub methods: &'static str,
    pub headers: Option<&'static str>,
    pub credentials: bool,
}

pub const HEALTH_CORS: CorsProfile = CorsProfile {
    methods: "GET, OPTIONS",
    headers: None,
    credentials: false,
};

pub const CONFIRM_CORS: CorsProfile = CorsProfile {
    methods: "POST, OPTIONS",
    headers: Some("Content-Type"),
    credentials: false,
};

pub const SUBMIT_CORS: CorsProfile = CorsProfile {
    methods: "GET,OPTIONS,PATCH,DELETE,POST,PUT",
    headers: Some(
        "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version",
    ),
    credentials: true,
};

pub fn api_routes(cors_origin: &str) -> Router<SharedState> {
    let origin = HeaderValue::from_str(cors_origin).unwrap_or(HeaderValue::from_static("*"));

    Router::new()
        // Health
        .route("/health", with_cors(get(health::hello), HEALTH_CORS, &origin))
        .route("/api/hello", with_cors(get(health::hello), HEALTH_CORS, &origin))
        // Confirmations
        .route(
            "/api/confirm",
            with_cors(post(submissions::confirm), CONFIRM_CORS, &origin),
        )
        .route(
            "/api/confirm/tracked",
            with_cors(post(submissions::confirm_tracked), CONFIRM_CORS, &origin),
        )
        .route(
            "/api/confirm/code",
            with_cors(post(submissions::confirm_code), CONFIRM_CORS, &origin),
        )
        // Generic submissions
        .route(
            "/api/submissions",
            with_cors(post(submissions::submit), SUBMIT_CORS, &origin),
        )
        .route(
            "/api/submissions/store",
            with_cors(post(submissions::submit_store), SUBMIT_CORS, &origin),
        )
}

/// Add the preflight answer, the JSON 405 fallback and the CORS headers.
fn with_cors(
    router: MethodRouter<SharedState>,
    cors: CorsProfile,
    origin: &HeaderValue,
) -> MethodRouter<SharedState> {
    let mut router: MethodRouter<SharedState> = router
        .options(preflight)
        .fallback(method_not_allowed)
        .layer::<_, std::convert::Infallible>(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("access-control-allow-origin"),
            origin.clone(),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("access-control-allow-methods"),
            HeaderValue::from_static(cors.methods),
        ));

    if let Some(headers) = cors.headers {
        router = router.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("access-control-allow-headers"),
            HeaderValue::from_static(headers),
        ));
    }

    if cors.credentials {
        router = router.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("access-control-allow-credentials"),
            HeaderValue::from_static("true"),
        ));
    }

    router
}

/// CORS preflight: bare 200.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed.into_response()
}
