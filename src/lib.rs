//! hostname-server: answers every HTTP request with the name of the host
//! that served it.
//!
//! Used to show how a Kubernetes Service spreads requests over replicas:
//! each pod reports its own host name.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod resolver;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
