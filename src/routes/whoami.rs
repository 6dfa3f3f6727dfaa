//! The one and only handler: report which host served the request.

use std::fmt::Write;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use http::HeaderMap;

use crate::config::ANNOUNCE_TARGET;
use crate::error::AppError;
use crate::state::AppState;

/// Answers any method on any path with `You've hit <HOSTNAME>`.
///
/// Method, path and body never influence the response. Headers are only
/// read when `whoami.echo_request` is enabled.
pub async fn whoami(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<String, AppError> {
    tracing::info!(target: ANNOUNCE_TARGET, "received request from {}", remote);

    if !state.take_healthy() {
        return Err(AppError::Unhealthy);
    }

    let hostname = state.resolver.resolve().map_err(AppError::Hostname)?;

    if state.config.whoami.echo_request {
        Ok(render_echo(&hostname, remote, &headers))
    } else {
        Ok(render(&hostname))
    }
}

/// `You've hit <HOSTNAME>`
pub fn render(hostname: &str) -> String {
    format!("You've hit <{hostname}>")
}

/// Verbose variant: the remote address followed by every request header,
/// sorted by name, one `"name" => "first value"` pair per line.
pub fn render_echo(hostname: &str, remote: SocketAddr, headers: &HeaderMap) -> String {
    let mut body = format!("{} from {:?}\n\n", render(hostname), remote.to_string());

    let mut names: Vec<_> = headers.keys().collect();
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    for name in names {
        if let Some(value) = headers.get(name) {
            let value = String::from_utf8_lossy(value.as_bytes());
            let _ = writeln!(body, "{:?} => {:?}", name.as_str(), value);
        }
    }

    body
}
