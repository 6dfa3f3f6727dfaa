//! Per-request tracing span.
//!
//! Every request gets a UUID v4 `request_id` and a span carrying the caller's
//! address, so the `received request from` line, any lookup failure and the
//! completion line can be tied together when several replicas log into the
//! same place.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Wraps the request in a `request` span and logs status and duration once
/// the handler has answered.
pub async fn request_span_layer(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let span = tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        remote = ?remote,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::debug!(status = response.status().as_u16(), "answered");

        response
    }
    .instrument(span)
    .await
}

