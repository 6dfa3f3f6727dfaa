//! Host name resolution.
//!
//! The handler only needs "the name of this machine". `HostnameResolver` is
//! the seam between the handler and the operating system so the per-request
//! lookup, the cached lookup and test doubles are interchangeable.

use std::io;

/// Source of the host name reported in responses.
pub trait HostnameResolver: Send + Sync {
    fn resolve(&self) -> io::Result<String>;
}

/// Asks the operating system on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostname;

impl HostnameResolver for SystemHostname {
    fn resolve(&self) -> io::Result<String> {
        system_hostname()
    }
}

/// Resolved once, then served from memory.
///
/// The host name does not change during the life of a pod, so this is
/// behaviorally identical to `SystemHostname`.
#[derive(Debug, Clone)]
pub struct CachedHostname {
    name: String,
}

impl CachedHostname {
    /// Resolve through `inner` now and keep the result.
    pub fn resolve_now(inner: &dyn HostnameResolver) -> io::Result<Self> {
        Ok(Self {
            name: inner.resolve()?,
        })
    }
}

impl HostnameResolver for CachedHostname {
    fn resolve(&self) -> io::Result<String> {
        Ok(self.name.clone())
    }
}

/// The operating system's host name as UTF-8.
pub fn system_hostname() -> io::Result<String> {
    let name = ::hostname::get()?;
    let name = name.into_string().map_err(|raw| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("host name is not valid UTF-8: {raw:?}"),
        )
    })?;

    if name.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "operating system reported an empty host name",
        ));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl HostnameResolver for Counting {
        fn resolve(&self) -> io::Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("node-{n}"))
        }
    }

    struct Broken;

    impl HostnameResolver for Broken {
        fn resolve(&self) -> io::Result<String> {
            Err(io::Error::other("uts namespace unavailable"))
        }
    }

    #[test]
    fn system_hostname_matches_os() {
        let expected = ::hostname::get().unwrap().into_string().unwrap();
        assert_eq!(SystemHostname.resolve().unwrap(), expected);
        assert!(!expected.is_empty());
    }

    #[test]
    fn cached_hostname_resolves_exactly_once() {
        let inner = Counting {
            calls: AtomicUsize::new(0),
        };
        let cached = CachedHostname::resolve_now(&inner).unwrap();

        assert_eq!(cached.resolve().unwrap(), "node-0");
        assert_eq!(cached.resolve().unwrap(), "node-0");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cached_hostname_propagates_startup_failure() {
        let err = CachedHostname::resolve_now(&Broken).unwrap_err();
        assert_eq!(err.to_string(), "uts namespace unavailable");
    }
}
