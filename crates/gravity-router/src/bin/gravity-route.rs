use alloy::providers::RootProvider;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gravity_router::path::{canonical, parse_token};
use gravity_router::payment::{parse_amount, parse_decimals, quote_min_out, token_decimals};
use gravity_router::{
    calculate_route_confidence_with, OnChainTokenGraph, RouteError, RouteFinder, RouterConfig,
    SearchStats, DEFAULT_SLIPPAGE_BPS,
};

#[derive(Serialize)]
struct RouteReport {
    token_in: String,
    settlement_token: String,
    max_hops: usize,
    route: Option<Vec<String>>,
    hops: Option<usize>,
    confidence: Option<u8>,
    min_amount_out: Option<String>,
    stats: SearchStats,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {msg}");
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = RouterConfig::from_env().unwrap_or_else(|e| fail(e));

    let token_in = match std::env::args().nth(1).or_else(|| std::env::var("TOKEN_IN").ok()) {
        Some(raw) => parse_token(&raw).unwrap_or_else(|e| fail(e)),
        None => fail("usage: gravity-route <token-in-address> (or set TOKEN_IN)"),
    };

    let provider: RootProvider = RootProvider::new_http(
        config
            .rpc_url
            .parse()
            .unwrap_or_else(|e| fail(format!("invalid RPC_URL: {e}"))),
    );

    tracing::info!(config = ?config, token_in = %canonical(&token_in), "resolving route");

    let graph = OnChainTokenGraph::new(provider.clone(), config.router_address);
    match graph.health_check().await {
        Ok(block) => tracing::info!(block, "RPC reachable"),
        Err(e) => tracing::warn!(error = %e, "RPC health check failed, continuing"),
    }
    match graph.check_chain_id(config.chain_id).await {
        Ok(chain_id) => tracing::debug!(chain_id, "chain id confirmed"),
        Err(e @ RouteError::ChainMismatch { .. }) => fail(e),
        Err(e) => tracing::warn!(error = %e, "could not confirm chain id, continuing"),
    }

    let finder = RouteFinder::new(graph, &config);
    let search = finder
        .find_optimal_path_with_stats(token_in, config.settlement_token, config.max_hops)
        .await;
    let route = search.path.clone();

    let min_amount_out = match (&route, config.payment_address, std::env::var("AMOUNT_IN").ok()) {
        (Some(path), Some(payment), Some(raw_amount)) => {
            let decimals = match std::env::var("TOKEN_DECIMALS") {
                Ok(raw) if !raw.trim().is_empty() => {
                    parse_decimals(&raw).unwrap_or_else(|e| fail(e))
                }
                _ => token_decimals(&provider, token_in)
                    .await
                    .unwrap_or_else(|e| fail(e)),
            };
            let amount_in = parse_amount(&raw_amount, decimals).unwrap_or_else(|e| fail(e));
            let quote = quote_min_out(
                &provider,
                payment,
                token_in,
                amount_in,
                path,
                DEFAULT_SLIPPAGE_BPS,
            )
            .await;
            match quote {
                Ok(min_out) => Some(min_out.to_string()),
                Err(e) => {
                    tracing::warn!(error = %e, "quote failed");
                    None
                }
            }
        }
        _ => None,
    };

    let report = RouteReport {
        token_in: canonical(&token_in),
        settlement_token: canonical(&config.settlement_token),
        max_hops: config.max_hops,
        route: route
            .as_ref()
            .map(|p| p.tokens().iter().map(canonical).collect()),
        hops: route.as_ref().map(|p| p.hops()),
        confidence: route.as_ref().map(|p| {
            calculate_route_confidence_with(p.tokens(), p.hops(), &config.high_quality_tokens)
        }),
        min_amount_out,
        stats: search.stats,
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(e),
    }

    if route.is_none() {
        std::process::exit(1);
    }
}
