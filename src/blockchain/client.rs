// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only JSON-RPC client for the upstream chain node.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};
use async_trait::async_trait;

/// HTTP provider type (with the default fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Current fee data reported by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeData {
    /// Legacy gas price (`eth_gasPrice`) in wei.
    pub gas_price: U256,
}

/// The three upstream reads the aggregator needs.
///
/// Implementations do no caching and no retries.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Native balance of `address` at the latest block, in wei.
    async fn get_balance(&self, address: Address) -> Result<U256, RpcError>;

    /// Current chain height.
    async fn get_block_number(&self) -> Result<u64, RpcError>;

    async fn get_fee_data(&self) -> Result<FeeData, RpcError>;
}

/// alloy-backed [`ChainRpc`] over HTTP.
pub struct EvmClient {
    provider: HttpProvider,
    timeout: Duration,
}

impl EvmClient {
    /// Create a client for `rpc_url`; every call is bounded by `timeout`.
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, RpcError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| RpcError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self { provider, timeout })
    }

    async fn call<T, E, F>(&self, method: &'static str, fut: F) -> Result<T, RpcError>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(RpcError::Request {
                method,
                message: e.to_string(),
            }),
            Err(_) => Err(RpcError::Timeout {
                method,
                after: self.timeout,
            }),
        }
    }
}

#[async_trait]
impl ChainRpc for EvmClient {
    async fn get_balance(&self, address: Address) -> Result<U256, RpcError> {
        self.call("eth_getBalance", async {
            self.provider.get_balance(address).await
        })
        .await
    }

    async fn get_block_number(&self) -> Result<u64, RpcError> {
        self.call("eth_blockNumber", async {
            self.provider.get_block_number().await
        })
        .await
    }

    async fn get_fee_data(&self) -> Result<FeeData, RpcError> {
        let gas_price = self
            .call("eth_gasPrice", async { self.provider.get_gas_price().await })
            .await?;
        Ok(FeeData {
            gas_price: U256::from(gas_price),
        })
    }
}

/// Errors that can occur talking to the upstream node.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RpcError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("{method} failed: {message}")]
    Request {
        method: &'static str,
        message: String,
    },

    #[error("{method} timed out after {after:?}")]
    Timeout {
        method: &'static str,
        after: Duration,
    },
}
