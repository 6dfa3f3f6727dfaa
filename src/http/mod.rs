//! HTTP listener.
//!
//! Plain HTTP/1.1 on a single TCP listener, one task per connection. No TLS
//! and no graceful shutdown: the process runs until it is killed.

mod server;

pub use server::{bind, start_server, BoundServer, ServerError};
