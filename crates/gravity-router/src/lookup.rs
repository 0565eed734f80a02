//! Route lookups the caller can walk away from.
//!
//! The payer flow restarts a lookup whenever the selected token or amount
//! changes. The superseded lookup keeps running (in-flight RPC calls are not
//! interrupted) but its result is dropped once it has been cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::Address;
use tokio::task::JoinHandle;

use crate::finder::RouteFinder;
use crate::graph::TokenGraph;
use crate::path::Path;

/// What a finished lookup means for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Found(Path),
    NoRoute,
    /// Cancelled before the result was consumed; the result was discarded.
    Cancelled,
}

impl RouteOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            RouteOutcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            RouteOutcome::Found(path) => Some(path),
            _ => None,
        }
    }
}

/// Cloneable handle that cancels one lookup.
#[derive(Debug, Clone)]
pub struct LookupCanceller {
    cancelled: Arc<AtomicBool>,
}

impl LookupCanceller {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A route search running on the tokio runtime.
pub struct RouteLookup {
    canceller: LookupCanceller,
    handle: JoinHandle<Option<Path>>,
}

impl RouteLookup {
    /// Start searching for a route from `source` to `destination`.
    pub fn spawn<G>(
        finder: Arc<RouteFinder<G>>,
        source: Address,
        destination: Address,
        max_hops: usize,
    ) -> Self
    where
        G: TokenGraph + 'static,
    {
        let handle = tokio::spawn(async move {
            finder
                .find_optimal_path(source, destination, max_hops)
                .await
        });
        Self {
            canceller: LookupCanceller {
                cancelled: Arc::new(AtomicBool::new(false)),
            },
            handle,
        }
    }

    /// Start searching for a route into the finder's settlement token.
    pub fn spawn_settlement<G>(finder: Arc<RouteFinder<G>>, source: Address) -> Self
    where
        G: TokenGraph + 'static,
    {
        let destination = finder.settlement_token();
        let max_hops = finder.max_hops();
        Self::spawn(finder, source, destination, max_hops)
    }

    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.canceller.is_cancelled()
    }

    pub fn canceller(&self) -> LookupCanceller {
        self.canceller.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the search. The cancellation flag is checked after the search
    /// completes and before its result is handed out.
    pub async fn outcome(self) -> RouteOutcome {
        let result = self.handle.await;

        if self.canceller.is_cancelled() {
            tracing::debug!("route lookup cancelled, discarding result");
            return RouteOutcome::Cancelled;
        }

        match result {
            Ok(Some(path)) => RouteOutcome::Found(path),
            Ok(None) => RouteOutcome::NoRoute,
            Err(e) => {
                tracing::error!(error = %e, "route lookup task failed");
                RouteOutcome::NoRoute
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::error::RouteError;
    use std::collections::HashMap;
    use tokio::sync::Notify;

    fn token(b: u8) -> Address {
        Address::with_last_byte(b)
    }

    /// Graph whose neighbor calls wait until released.
    struct GatedGraph {
        edges: HashMap<Address, Vec<Address>>,
        gate: Arc<Notify>,
    }

    impl TokenGraph for GatedGraph {
        async fn neighbors(&self, t: Address) -> Result<Vec<Address>, RouteError> {
            self.gate.notified().await;
            Ok(self.edges.get(&t).cloned().unwrap_or_default())
        }

        async fn validate_path(&self, _path: &[Address]) -> Result<bool, RouteError> {
            Ok(true)
        }
    }

    fn gated_finder() -> (Arc<RouteFinder<GatedGraph>>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let graph = GatedGraph {
            edges: HashMap::from([(token(0xa), vec![token(0xd)])]),
            gate: gate.clone(),
        };
        let finder = RouteFinder::new(graph, &RouterConfig::new(token(0xff), token(0xd)));
        (Arc::new(finder), gate)
    }

    #[tokio::test]
    async fn test_lookup_finds_route() {
        let (finder, gate) = gated_finder();
        let lookup = RouteLookup::spawn_settlement(finder, token(0xa));
        gate.notify_one();

        let outcome = lookup.outcome().await;
        assert_eq!(
            outcome.path().map(Path::tokens),
            Some(&[token(0xa), token(0xd)][..])
        );
    }

    #[tokio::test]
    async fn test_cancelled_lookup_discards_result() {
        let (finder, gate) = gated_finder();
        let lookup = RouteLookup::spawn(finder, token(0xa), token(0xd), 3);

        let canceller = lookup.canceller();
        canceller.cancel();
        assert!(lookup.is_cancelled());

        // The search still runs to completion.
        gate.notify_one();
        assert_eq!(lookup.outcome().await, RouteOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_lookup_without_route() {
        let (finder, gate) = gated_finder();
        let lookup = RouteLookup::spawn(finder, token(0xb), token(0xd), 3);
        gate.notify_one();
        assert_eq!(lookup.outcome().await, RouteOutcome::NoRoute);
    }

    #[tokio::test]
    async fn test_identity_lookup_needs_no_graph() {
        let (finder, _gate) = gated_finder();
        let lookup = RouteLookup::spawn(finder, token(0xd), token(0xd), 3);
        let outcome = lookup.outcome().await;
        assert_eq!(outcome.into_path(), Some(Path::identity(token(0xd))));
    }
}
