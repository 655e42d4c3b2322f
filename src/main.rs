// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eth_address_info::{
    aggregator::AddressInfoService,
    api::router,
    blockchain::EvmClient,
    cache::TtlCache,
    clock::SystemClock,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::RedbBalanceLedger,
};

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("Failed to load configuration");
    init_tracing(config.log_format);

    let rpc = EvmClient::new(&config.rpc_url, config.rpc_timeout)
        .expect("Failed to build JSON-RPC client");
    let clock = Arc::new(SystemClock);
    let cache = TtlCache::new(config.cache_capacity, clock.clone());
    let ledger =
        RedbBalanceLedger::open(&config.ledger_path).expect("Failed to open balance ledger");

    info!(
        ledger_path = %config.ledger_path.display(),
        cache_ttl_secs = config.cache_ttl.as_secs(),
        cache_capacity = config.cache_capacity,
        "Balance ledger opened"
    );

    let service = AddressInfoService::new(
        Arc::new(rpc),
        Arc::new(cache),
        Arc::new(ledger),
        clock,
    )
    .with_cache_ttl(config.cache_ttl);

    let app = router(AppState::new(Arc::new(service)));

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .expect("Failed to parse bind address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
            shutdown.cancel();
        }
    });

    info!(%addr, "Address info server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .expect("HTTP server failed");

    info!("Server stopped");
}
