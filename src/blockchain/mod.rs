// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM chain integration.
//!
//! This module provides:
//! - Address validation and EIP-55 normalisation
//! - The read-only JSON-RPC client (balance, block height, fee data)
//! - Wei to ether/gwei display formatting

pub mod address;
pub mod client;
pub mod units;

pub use address::{AddressError, EthAddress};
pub use client::{ChainRpc, EvmClient, FeeData, RpcError};
pub use units::{format_ether, format_gwei, format_units};
