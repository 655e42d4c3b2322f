// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Address Info Service - EVM address snapshot aggregator
//!
//! Serves the native balance of an address together with the current gas
//! price and block height, read from a single JSON-RPC node. Chain-wide values
//! are cached for a short TTL; every observed balance is recorded in an
//! embedded redb ledger and can be listed back as a history.
//!
//! ## Modules
//!
//! - `aggregator` - Request orchestration and cache-aside policy
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Address validation, unit formatting, JSON-RPC client
//! - `cache` - In-process TTL cache
//! - `storage` - Balance ledger (redb)

pub mod aggregator;
pub mod api;
pub mod blockchain;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
