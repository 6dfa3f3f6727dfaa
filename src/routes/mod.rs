//! HTTP routing.
//!
//! There is no route table: every method on every path falls through to the
//! `whoami` handler. Responses are marked `no-store` so caches in front of a
//! Service never pin one replica's host name.
//!
//! Each request runs inside a span with its own `request_id` and the
//! caller's address.

pub mod whoami;

use axum::{middleware, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::request_span_layer;
use crate::state::AppState;

/// Creates the Axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(whoami::whoami)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Outermost, so the span covers the whole request
        .layer(middleware::from_fn(request_span_layer))
}
