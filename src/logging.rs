//! Tracing subscriber setup.
//!
//! The startup line and the per-request line are part of the server's
//! observable behavior, so they are logged under `ANNOUNCE_TARGET` and that
//! target is forced on at info whatever filter the operator supplies.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ANNOUNCE_DIRECTIVE;

/// Build the filter from `directives`, keeping the announce lines enabled.
pub fn env_filter(directives: &str) -> Result<EnvFilter, ParseError> {
    Ok(EnvFilter::builder()
        .parse_lossy(directives)
        .add_directive(ANNOUNCE_DIRECTIVE.parse()?))
}

/// Install the global subscriber writing to stdout as text or JSON.
pub fn init(directives: &str, json: bool) -> Result<(), ParseError> {
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter(directives)?)
        .with(fmt_layer)
        .init();

    Ok(())
}
