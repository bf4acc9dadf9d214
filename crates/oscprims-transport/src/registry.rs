//! Open-socket bookkeeping.
//!
//! Every open socket holds a [`SocketLease`] taken from a [`SocketRegistry`].
//! Dropping the socket drops the lease, so the count can never drift from the
//! set of live sockets.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::trace;

/// Tracks how many sockets opened through it are still alive.
///
/// Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct SocketRegistry {
    open: Arc<AtomicUsize>,
}

impl SocketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live leases.
    pub fn open_sockets(&self) -> usize {
        self.open.load(Ordering::Acquire)
    }

    /// True when no socket from this registry is open.
    pub fn is_idle(&self) -> bool {
        self.open_sockets() == 0
    }

    /// Take a lease for a newly opened socket.
    pub fn acquire(&self) -> SocketLease {
        let now_open = self.open.fetch_add(1, Ordering::AcqRel) + 1;
        trace!(open_sockets = now_open, "socket lease acquired");
        SocketLease {
            open: Arc::clone(&self.open),
        }
    }
}

/// Proof that a socket is registered as open. Released on drop.
#[derive(Debug)]
pub struct SocketLease {
    open: Arc<AtomicUsize>,
}

impl Drop for SocketLease {
    fn drop(&mut self) {
        let now_open = self.open.fetch_sub(1, Ordering::AcqRel) - 1;
        trace!(open_sockets = now_open, "socket lease released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leases_track_open_count() {
        let registry = SocketRegistry::new();
        assert!(registry.is_idle());

        let a = registry.acquire();
        let b = registry.clone().acquire();
        assert_eq!(registry.open_sockets(), 2);

        drop(a);
        assert_eq!(registry.open_sockets(), 1);
        drop(b);
        assert!(registry.is_idle());
    }

    #[test]
    fn registries_are_independent() {
        let first = SocketRegistry::new();
        let second = SocketRegistry::new();

        let _lease = first.acquire();
        assert_eq!(first.open_sockets(), 1);
        assert_eq!(second.open_sockets(), 0);
    }
}
