use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::SharedState;
use crate::submission::pipeline::{self, EndpointProfile, PipelineResult, ResponseShape};
use crate::submission::{metadata, parser};

pub async fn confirm(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, &pipeline::CONFIRM, addr, &headers, body).await
}

pub async fn confirm_tracked(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, &pipeline::CONFIRM_TRACKED, addr, &headers, body).await
}

pub async fn confirm_code(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, &pipeline::CONFIRM_CODE, addr, &headers, body).await
}

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, &pipeline::SUBMIT, addr, &headers, body).await
}

pub async fn submit_store(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, &pipeline::SUBMIT_STORE, addr, &headers, body).await
}

async fn handle(
    state: &SharedState,
    profile: &EndpointProfile,
    addr: SocketAddr,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    tracing::info!(endpoint = profile.name, "Submission received");

    let raw = match parser::parse_request(headers, body).await {
        Ok(raw) => raw,
        Err(e) => return e.respond(state.config.dev_mode()),
    };

    let ip = metadata::client_ip(headers, Some(addr.ip()), &state.config.trusted_proxies);

    match pipeline::run(state, profile, &raw, ip).await {
        Ok(result) => render(state, profile, result),
        Err(e) => {
            tracing::debug!(endpoint = profile.name, "Submission rejected: {e}");
            e.respond(state.config.dev_mode())
        }
    }
}

fn render(state: &SharedState, profile: &EndpointProfile, result: PipelineResult) -> Response {
    let submission = &result.submission;
    let redirect = &state.config.redirect_path;

    let body = match profile.response {
        ResponseShape::Ack => json!({
            "success": true,
            "message": "Data sent successfully",
        }),
        ResponseShape::Tracked => json!({
            "success": true,
            "message": "Data processed successfully",
            "data": {
                "id": submission.id,
                "telegramSent": result.delivery.is_some_and(|d| d.sent()),
            },
            "redirect": redirect,
        }),
        ResponseShape::Echo => json!({
            "success": true,
            "message": "Data processed successfully",
            "data": {
                "id": submission.id,
                "tarif": submission.tarif,
                "nohp": submission.nohp,
                "nama": submission.nama,
                "saldo": submission.saldo,
                "timestamp": submission.timestamp,
            },
            "redirect": redirect,
        }),
    };

    (StatusCode::OK, Json(body)).into_response()
}
