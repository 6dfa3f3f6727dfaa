//! Shared application state for request handlers.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::resolver::{CachedHostname, HostnameResolver, SystemHostname};

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Everything here is read-only except the optional healthy budget, which is
/// a single atomic counter.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub resolver: Arc<dyn HostnameResolver>,
    pub health: Option<Arc<HealthBudget>>,
}

impl AppState {
    /// Creates state with an explicit resolver.
    pub fn new(config: AppConfig, resolver: Arc<dyn HostnameResolver>) -> Self {
        let health = config
            .whoami
            .healthy_count
            .map(|count| Arc::new(HealthBudget::new(count)));

        Self {
            config: Arc::new(config),
            resolver,
            health,
        }
    }

    /// Creates state with the resolver selected by `whoami.cache_hostname`.
    ///
    /// Fails only when caching is enabled and the startup lookup fails.
    pub fn from_config(config: AppConfig) -> io::Result<Self> {
        let resolver: Arc<dyn HostnameResolver> = if config.whoami.cache_hostname {
            let cached = CachedHostname::resolve_now(&SystemHostname)?;
            tracing::info!(hostname = %cached.resolve()?, "Cached host name");
            Arc::new(cached)
        } else {
            Arc::new(SystemHostname)
        };

        Ok(Self::new(config, resolver))
    }

    /// Consume one healthy request. Always true when no budget is configured.
    pub fn take_healthy(&self) -> bool {
        self.health.as_ref().map_or(true, |budget| budget.take())
    }
}

/// Countdown of requests that are still answered normally.
#[derive(Debug)]
pub struct HealthBudget {
    remaining: AtomicU64,
}

impl HealthBudget {
    pub fn new(count: u64) -> Self {
        Self {
            remaining: AtomicU64::new(count),
        }
    }

    /// Decrement if anything is left; false once the budget reaches zero.
    pub fn take(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }
}
