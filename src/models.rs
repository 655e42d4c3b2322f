// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Response structures returned by the address endpoints. All types derive
//! `Serialize`, `Deserialize` and `ToSchema` for JSON handling and the
//! OpenAPI document. Field names are camelCase on the wire.
//!
//! Wei amounts are carried as decimal strings: they routinely exceed 64 bits
//! and must never pass through a float.

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::blockchain::{format_ether, format_gwei, EthAddress};

// =============================================================================
// Address Info
// =============================================================================

/// Current gas price in raw and display units.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GasPrice {
    /// Gas price in wei (decimal integer string).
    #[schema(example = "20000000000")]
    pub wei: String,
    /// Gas price in gwei (fixed-point, 9 decimals shifted).
    #[schema(example = "20.0")]
    pub gwei: String,
}

impl From<U256> for GasPrice {
    fn from(wei: U256) -> Self {
        Self {
            wei: wei.to_string(),
            gwei: format_gwei(wei),
        }
    }
}

/// Native balance in raw and display units.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NativeBalance {
    /// Balance in wei (decimal integer string).
    #[schema(example = "1000000000000000000")]
    pub wei: String,
    /// Balance in ether (fixed-point, 18 decimals shifted).
    #[schema(example = "1.0")]
    pub ether: String,
}

impl From<U256> for NativeBalance {
    fn from(wei: U256) -> Self {
        Self {
            wei: wei.to_string(),
            ether: format_ether(wei),
        }
    }
}

/// Snapshot of chain state for one address.
///
/// Assembled per request; never cached as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    /// EIP-55 checksummed address.
    #[schema(example = "0x000000000000000000000000000000000000dEaD")]
    pub address: String,
    pub gas_price: GasPrice,
    /// Latest block height.
    #[schema(example = 12345678)]
    pub block_number: u64,
    pub balance: NativeBalance,
}

impl AddressInfo {
    pub fn new(address: &EthAddress, gas_price: U256, block_number: u64, balance: U256) -> Self {
        Self {
            address: address.checksummed(),
            gas_price: gas_price.into(),
            block_number,
            balance: balance.into(),
        }
    }
}

// =============================================================================
// Balance Ledger
// =============================================================================

/// One observed balance of an address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    /// EIP-55 checksummed address.
    pub address: String,
    /// Balance in wei (decimal integer string).
    pub balance: String,
    /// When the balance was observed.
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_info_serializes_camel_case() {
        let addr = EthAddress::parse("0x000000000000000000000000000000000000dEaD").unwrap();
        let info = AddressInfo::new(
            &addr,
            U256::from(20_000_000_000u64),
            12_345_678,
            U256::from(1_000_000_000_000_000_000u64),
        );

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "address": "0x000000000000000000000000000000000000dEaD",
                "gasPrice": { "wei": "20000000000", "gwei": "20.0" },
                "blockNumber": 12345678,
                "balance": { "wei": "1000000000000000000", "ether": "1.0" }
            })
        );
    }

    #[test]
    fn balance_record_uses_last_updated_field() {
        let record = BalanceRecord {
            address: "0x000000000000000000000000000000000000dEaD".to_string(),
            balance: "5".to_string(),
            last_updated: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("lastUpdated").is_some());
        assert!(json.get("last_updated").is_none());

        let back: BalanceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
