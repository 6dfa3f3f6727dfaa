//! Listener startup.
//!
//! A `BoundServer` only exists once the socket is bound, so "listening" is a
//! type rather than a flag. There is no transition back to stopped.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ANNOUNCE_TARGET;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// A listener that is bound and ready to accept connections.
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
}

/// Bind the listener to `host:port`. The host may be a name; it is resolved
/// here and the first address that binds wins. Failure is fatal to the process.
pub async fn bind(addr: &str) -> Result<BoundServer, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    Ok(BoundServer { listener })
}

impl BoundServer {
    /// The address actually bound, which differs from the requested one for port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the process exits.
    ///
    /// Each connection is served on its own task; the peer address reaches
    /// handlers as `ConnectInfo<SocketAddr>`.
    pub async fn serve(self, app: Router) -> Result<(), ServerError> {
        let addr = self.local_addr()?;
        tracing::info!(target: ANNOUNCE_TARGET, %addr, "listening");

        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}

/// Bind and serve in one step.
pub async fn start_server(app: Router, addr: &str) -> Result<(), ServerError> {
    bind(addr).await?.serve(app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn port_zero_reports_real_port() {
        let server = bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
        assert!(addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn host_names_are_resolved() {
        let server = bind("localhost:0").await.unwrap();
        assert!(server.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn unresolvable_host_is_bind_error() {
        let err = bind("no-such-host.invalid:8080").await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { ref addr, .. } if addr == "no-such-host.invalid:8080"));
    }

    #[tokio::test]
    async fn port_in_use_is_bind_error() {
        let first = bind("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().unwrap().to_string();

        let err = bind(&taken).await.unwrap_err();
        assert!(err.to_string().contains(&taken));
        match err {
            ServerError::Bind { addr, .. } => assert_eq!(addr, taken),
            other => panic!("expected bind error, got {other:?}"),
        }
    }
}
