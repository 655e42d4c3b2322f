// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Durable state of the service: the balance ledger.
//!
//! ## Storage Layout
//!
//! ```text
//! $LEDGER_PATH (redb file)
//!   latest_balances   address -> latest observation
//!   balance_history   address|!timestamp|nonce -> observation
//! ```
//!
//! The ledger is written only by the aggregator after a successful address
//! info fetch and is never pruned here.

pub mod ledger;

pub use ledger::{BalanceLedger, LedgerError, LedgerResult, RedbBalanceLedger};
