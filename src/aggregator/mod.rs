// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Address Info Aggregator
//!
//! Builds a `{balance, gasPrice, blockNumber}` snapshot for one address.
//!
//! ## Strategy
//!
//! 1. **Validation**: the address is checked before anything else; a
//!    malformed address never reaches the RPC client.
//! 2. **Fan-out**: gas price, block number and balance are read concurrently
//!    and joined; the first failure fails the request and nothing partial is
//!    returned.
//! 3. **Cache-aside**: gas price and block number are chain-wide and go
//!    through the cache with a fixed TTL. Balance is always read fresh.
//! 4. **Ledger**: once all three values are in hand the balance is written to
//!    the ledger. A failed write is logged and the result still returned.
//!
//! ## Cache race
//!
//! Population on a miss is not synchronised. Two requests racing on a cold
//! key may both fetch and both write; the last write wins and both values are
//! equally fresh.

use std::fmt::Display;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use tracing::{debug, warn};

use crate::blockchain::{ChainRpc, EthAddress, RpcError};
use crate::cache::CacheStore;
use crate::clock::Clock;
use crate::models::{AddressInfo, BalanceRecord};
use crate::storage::{BalanceLedger, LedgerError};


/// Cache key for the chain-wide gas price.
pub const GAS_PRICE_CACHE_KEY: &str = "eth:gas_price";

/// Cache key for the chain-wide latest block number.
pub const BLOCK_NUMBER_CACHE_KEY: &str = "eth:block_number";

/// TTL applied to both chain-wide cache entries.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Errors surfaced to callers of [`AddressInfoService`].
#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    /// The address failed the well-formedness check.
    #[error("Invalid Ethereum address")]
    InvalidInput(String),

    /// An upstream read failed or timed out. Never retried.
    #[error("Failed to fetch Ethereum data: {0}")]
    UpstreamFailure(#[source] RpcError),

    /// Only returned by ledger reads.
    #[error("Failed to read balance ledger: {0}")]
    PersistenceFailure(#[source] LedgerError),
}

/// The aggregation core. Shared across requests behind an `Arc`.
pub struct AddressInfoService {
    rpc: Arc<dyn ChainRpc>,
    cache: Arc<dyn CacheStore>,
    ledger: Arc<dyn BalanceLedger>,
    clock: Arc<dyn Clock>,
    cache_ttl: Duration,
}

impl AddressInfoService {
    pub fn new(
        rpc: Arc<dyn ChainRpc>,
        cache: Arc<dyn CacheStore>,
        ledger: Arc<dyn BalanceLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rpc,
            cache,
            ledger,
            clock,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the TTL used for gas price and block number entries.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn ledger(&self) -> &Arc<dyn BalanceLedger> {
        &self.ledger
    }

    /// Balance, gas price and block number for `address`, recording the
    /// balance in the ledger.
    pub async fn get_address_info(&self, address: &str) -> Result<AddressInfo, AggregatorError> {
        let address = parse_address(address)?;

        let (gas_price, block_number, balance) = tokio::try_join!(
            self.gas_price(),
            self.block_number(),
            self.rpc.get_balance(address.as_address()),
        )
        .map_err(|e| {
            warn!(address = %address, error = %e, "Upstream fetch failed");
            AggregatorError::UpstreamFailure(e)
        })?;

        let observed_at = self.clock.now();
        let address_str = address.checksummed();
        if let Err(e) = self
            .ledger
            .upsert(&address_str, &balance.to_string(), observed_at)
            .await
        {
            warn!(address = %address_str, error = %e, "Balance ledger upsert failed");
        }

        Ok(AddressInfo::new(&address, gas_price, block_number, balance))
    }

    /// Every recorded balance for `address`, most recent first.
    pub async fn get_balance_history(
        &self,
        address: &str,
    ) -> Result<Vec<BalanceRecord>, AggregatorError> {
        let address = parse_address(address)?;
        self.ledger
            .history(&address.checksummed())
            .await
            .map_err(AggregatorError::PersistenceFailure)
    }

    /// The most recent recorded balance for `address`, if any.
    pub async fn get_latest_balance(
        &self,
        address: &str,
    ) -> Result<Option<BalanceRecord>, AggregatorError> {
        let address = parse_address(address)?;
        self.ledger
            .latest(&address.checksummed())
            .await
            .map_err(AggregatorError::PersistenceFailure)
    }

    async fn gas_price(&self) -> Result<U256, RpcError> {
        self.read_through(GAS_PRICE_CACHE_KEY, || async {
            Ok(self.rpc.get_fee_data().await?.gas_price)
        })
        .await
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        self.read_through(BLOCK_NUMBER_CACHE_KEY, || self.rpc.get_block_number())
            .await
    }

    /// Cache-aside read of a chain-wide value.
    ///
    /// Cache read errors and unparseable entries count as a miss; a cache
    /// write error is logged and the fresh value returned anyway.
    async fn read_through<T, F, Fut>(&self, key: &str, fetch: F) -> Result<T, RpcError>
    where
        T: FromStr + Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RpcError>>,
    {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match raw.parse::<T>() {
                Ok(value) => {
                    debug!(key, "Cache hit");
                    return Ok(value);
                }
                Err(_) => warn!(key, value = %raw, "Discarding unparseable cache entry"),
            },
            Ok(None) => debug!(key, "Cache miss"),
            Err(e) => warn!(key, error = %e, "Cache read failed, fetching upstream"),
        }

        let fresh = fetch().await?;

        if let Err(e) = self.cache.set(key, fresh.to_string(), self.cache_ttl).await {
            warn!(key, error = %e, "Cache write failed");
        }
        Ok(fresh)
    }
}

fn parse_address(raw: &str) -> Result<EthAddress, AggregatorError> {
    EthAddress::parse(raw).map_err(|e| {
        debug!(address = raw, reason = %e, "Rejected address");
        AggregatorError::InvalidInput(raw.to_string())
    })
}
