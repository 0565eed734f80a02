use alloy::primitives::{Address, U256};
use alloy::providers::RootProvider;
use gravity_router::payment::quote_min_out;
use gravity_router::{OnChainTokenGraph, Path, RouteError, RouteFinder, RouterConfig, TokenGraph};

/// Provider pointed at a port nothing listens on: every RPC call fails fast.
fn dead_provider() -> RootProvider {
    RootProvider::new_http("http://localhost:1".parse().unwrap())
}

fn config() -> RouterConfig {
    RouterConfig::new(Address::with_last_byte(0xaa), Address::with_last_byte(0xd))
        .with_rpc_url("http://localhost:1")
}

#[tokio::test]
async fn test_unreachable_rpc_yields_no_route() {
    let config = config();
    let graph = OnChainTokenGraph::new(dead_provider(), config.router_address);
    let finder = RouteFinder::new(graph, &config);

    let search = finder
        .find_optimal_path_with_stats(Address::with_last_byte(0xa), config.settlement_token, 3)
        .await;

    assert_eq!(search.path, None);
    assert_eq!(search.stats.neighbor_fetches, 1);
    assert_eq!(search.stats.validations, 0);
}

#[tokio::test]
async fn test_unreachable_rpc_still_allows_identity_route() {
    let config = config();
    let graph = OnChainTokenGraph::new(dead_provider(), config.router_address);
    let finder = RouteFinder::new(graph, &config);

    let path = finder.find_settlement_route(config.settlement_token).await;
    assert_eq!(path, Some(Path::identity(config.settlement_token)));
}

#[tokio::test]
async fn test_validate_path_surfaces_chain_error() {
    let graph = OnChainTokenGraph::new(dead_provider(), Address::with_last_byte(0xaa));
    let err = graph
        .validate_path(&[Address::with_last_byte(1), Address::with_last_byte(2)])
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::Chain(_)));
}

#[tokio::test]
async fn test_health_check_fails_without_rpc() {
    let graph = OnChainTokenGraph::new(dead_provider(), Address::with_last_byte(0xaa));
    assert!(graph.health_check().await.is_err());
}

#[tokio::test]
async fn test_quote_reports_chain_error() {
    let provider = dead_provider();
    let path = Path::new(vec![Address::with_last_byte(1), Address::with_last_byte(0xd)]).unwrap();
    let err = quote_min_out(
        &provider,
        Address::with_last_byte(0xbb),
        Address::with_last_byte(1),
        U256::from(1_000u64),
        &path,
        500,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RouteError::Chain(_)));
}
