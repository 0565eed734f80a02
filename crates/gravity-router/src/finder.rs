//! Breadth-first route discovery over the on-chain token graph.
//!
//! The frontier holds whole path prefixes rather than single tokens because
//! acceptance is decided per path by the router's `validatePath`, not per
//! edge. Local adjacency only nominates candidates.

use std::collections::{HashMap, HashSet, VecDeque};
use std::panic::AssertUnwindSafe;

use alloy::primitives::Address;
use futures::FutureExt;
use serde::Serialize;

use crate::config::RouterConfig;
use crate::graph::TokenGraph;
use crate::path::{canonical, Path};

/// Counters for a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Prefixes taken off the frontier
    pub expansions: usize,
    /// Remote `getNeighbors` calls issued
    pub neighbor_fetches: usize,
    /// Neighbor lookups answered from the cache
    pub cache_hits: usize,
    /// Remote `validatePath` calls issued
    pub validations: usize,
}

/// Result of a search together with its counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSearch {
    pub path: Option<Path>,
    pub stats: SearchStats,
}

/// Neighbor lists fetched during one search. Failed fetches are stored as
/// empty so a token is never queried twice.
#[derive(Default)]
struct NeighborCache {
    entries: HashMap<Address, Vec<Address>>,
}

impl NeighborCache {
    async fn get_or_fetch<G: TokenGraph>(
        &mut self,
        graph: &G,
        token: Address,
        stats: &mut SearchStats,
    ) -> &[Address] {
        if self.entries.contains_key(&token) {
            stats.cache_hits += 1;
        } else {
            stats.neighbor_fetches += 1;
            let fetched = match graph.neighbors(token).await {
                Ok(neighbors) => {
                    tracing::debug!(
                        token = %canonical(&token),
                        count = neighbors.len(),
                        "fetched neighbors"
                    );
                    neighbors
                }
                Err(e) => {
                    tracing::warn!(
                        token = %canonical(&token),
                        error = %e,
                        "neighbor lookup failed, treating as no neighbors"
                    );
                    Vec::new()
                }
            };
            self.entries.insert(token, fetched);
        }
        self.entries.get(&token).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Finds conversion routes from a payer's token to a destination token.
///
/// Holds no per-search state, so one finder can serve concurrent searches
/// behind an `Arc`.
pub struct RouteFinder<G> {
    graph: G,
    settlement_token: Address,
    max_hops: usize,
}

impl<G> RouteFinder<G> {
    /// Create a finder that settles into `config.settlement_token` with
    /// `config.max_hops` as the default bound.
    pub fn new(graph: G, config: &RouterConfig) -> Self {
        Self {
            graph,
            settlement_token: config.settlement_token,
            max_hops: config.max_hops,
        }
    }

    pub fn settlement_token(&self) -> Address {
        self.settlement_token
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }
}

impl<G: TokenGraph> RouteFinder<G> {
    /// Route from `source` into the configured settlement token using the
    /// configured hop bound.
    pub async fn find_settlement_route(&self, source: Address) -> Option<Path> {
        self.find_optimal_path(source, self.settlement_token, self.max_hops)
            .await
    }

    /// Shortest (by hop count) router-validated path from `source` to
    /// `destination` with at most `max_hops` conversions, or `None`.
    ///
    /// Never fails: remote errors are absorbed per candidate and a panic in
    /// the search is logged and reported as no route.
    pub async fn find_optimal_path(
        &self,
        source: Address,
        destination: Address,
        max_hops: usize,
    ) -> Option<Path> {
        self.find_optimal_path_with_stats(source, destination, max_hops)
            .await
            .path
    }

    /// Same as [`Self::find_optimal_path`], also returning search counters.
    pub async fn find_optimal_path_with_stats(
        &self,
        source: Address,
        destination: Address,
        max_hops: usize,
    ) -> RouteSearch {
        tracing::debug!(
            source = %canonical(&source),
            destination = %canonical(&destination),
            max_hops,
            "finding route"
        );

        if source == destination {
            tracing::debug!("source is the destination, returning identity route");
            return RouteSearch {
                path: Some(Path::identity(source)),
                stats: SearchStats::default(),
            };
        }

        // Counters live outside the search future so a panic keeps what was
        // gathered before it.
        let mut stats = SearchStats::default();
        let outcome = AssertUnwindSafe(self.search(source, destination, max_hops, &mut stats))
            .catch_unwind()
            .await;

        match outcome {
            Ok(path) => RouteSearch { path, stats },
            Err(_) => {
                tracing::error!(
                    source = %canonical(&source),
                    destination = %canonical(&destination),
                    expansions = stats.expansions,
                    neighbor_fetches = stats.neighbor_fetches,
                    validations = stats.validations,
                    "route search panicked, reporting no route"
                );
                RouteSearch { path: None, stats }
            }
        }
    }

    async fn search(
        &self,
        source: Address,
        destination: Address,
        max_hops: usize,
        stats: &mut SearchStats,
    ) -> Option<Path> {
        let mut frontier: VecDeque<Path> = VecDeque::from([Path::identity(source)]);
        let mut visited: HashSet<Address> = HashSet::from([source]);
        let mut cache = NeighborCache::default();

        while let Some(prefix) = frontier.pop_front() {
            stats.expansions += 1;

            // A prefix at the bound is never extended. Destinations one step
            // past a shorter prefix were already checked when it was extended.
            if prefix.hops() >= max_hops {
                tracing::trace!(hops = prefix.hops(), "prefix at hop bound, skipping");
                continue;
            }

            let neighbors = cache
                .get_or_fetch(&self.graph, prefix.destination(), stats)
                .await;

            for &neighbor in neighbors {
                if !visited.insert(neighbor) {
                    continue;
                }

                let extended = prefix.extended(neighbor);
                if neighbor != destination {
                    frontier.push_back(extended);
                    continue;
                }

                stats.validations += 1;
                match self.graph.validate_path(extended.tokens()).await {
                    Ok(true) => {
                        tracing::info!(
                            route = %extended,
                            hops = extended.hops(),
                            expansions = stats.expansions,
                            neighbor_fetches = stats.neighbor_fetches,
                            validations = stats.validations,
                            "route found"
                        );
                        return Some(extended);
                    }
                    Ok(false) => {
                        tracing::debug!(hops = extended.hops(), "router rejected candidate path");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "path validation failed, discarding candidate");
                    }
                }
            }
        }

        tracing::info!(
            source = %canonical(&source),
            destination = %canonical(&destination),
            max_hops,
            expansions = stats.expansions,
            neighbor_fetches = stats.neighbor_fetches,
            validations = stats.validations,
            "no route found"
        );
        None
    }
}
