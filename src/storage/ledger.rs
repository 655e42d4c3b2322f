// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance ledger backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `latest_balances`: lowercase address → latest BalanceRecord (JSON)
//! - `balance_history`: composite key (address|!timestamp|nonce) → BalanceRecord (JSON)
//!
//! Every upsert appends one history row and replaces the latest row unless
//! the stored one is newer, so concurrent writers converge on the record
//! with the greatest `last_updated`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::models::BalanceRecord;

// =============================================================================
// Table Definitions
// =============================================================================

/// Latest observation per address.
const LATEST_BALANCES: TableDefinition<&str, &[u8]> = TableDefinition::new("latest_balances");

/// Every observation, newest first within an address prefix.
/// Key format: `address|!timestamp_be|nonce`.
const BALANCE_HISTORY: TableDefinition<&[u8], &[u8]> = TableDefinition::new("balance_history");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("ledger task failed: {0}")]
    Task(String),

    /// Backend unreachable. Not produced by the redb ledger; reserved for
    /// ledgers behind a network hop.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Durable store of observed balances.
#[async_trait]
pub trait BalanceLedger: Send + Sync {
    /// Record that `address` held `balance_wei` at `timestamp`.
    async fn upsert(
        &self,
        address: &str,
        balance_wei: &str,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<()>;

    /// All observations for `address`, most recent first.
    async fn history(&self, address: &str) -> LedgerResult<Vec<BalanceRecord>>;

    /// The observation with the greatest timestamp, if any.
    async fn latest(&self, address: &str) -> LedgerResult<Option<BalanceRecord>>;

    /// Cheap readiness probe.
    async fn health_check(&self) -> LedgerResult<()> {
        Ok(())
    }
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the balance_history table.
///
/// The timestamp is sign-flipped so it sorts as unsigned bytes, then
/// inverted so a forward scan returns newest first. The nonce keeps two
/// observations in the same microsecond distinct.
fn make_history_key(address: &str, timestamp: DateTime<Utc>, nonce: &Uuid) -> Vec<u8> {
    let addr = address.to_lowercase();
    let micros = timestamp.timestamp_micros();
    let mut key = Vec::with_capacity(addr.len() + 1 + 8 + 1 + 16);
    key.extend_from_slice(addr.as_bytes());
    key.push(b'|');
    key.extend_from_slice(&newest_first(micros).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(nonce.as_bytes());
    key
}

/// Order-reversing map from signed micros to an unsigned sort key.
fn newest_first(micros: i64) -> u64 {
    !((micros as u64) ^ (1 << 63))
}

fn make_prefix(address: &str) -> Vec<u8> {
    let addr = address.to_lowercase();
    let mut prefix = Vec::with_capacity(addr.len() + 1);
    prefix.extend_from_slice(addr.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Upper bound for a range scan over one address prefix.
fn make_prefix_end(address: &str) -> Vec<u8> {
    let mut end = make_prefix(address);
    end.extend_from_slice(&[0xFF; 32]);
    end
}

// =============================================================================
// RedbBalanceLedger
// =============================================================================

/// Embedded ACID balance ledger.
#[derive(Clone)]
pub struct RedbBalanceLedger {
    db: Arc<Database>,
}

impl RedbBalanceLedger {
    /// Open (or create) the ledger at the given path.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LATEST_BALANCES)?;
            let _ = write_txn.open_table(BALANCE_HISTORY)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Append `record` to the history and make it the latest unless a newer
    /// one is already stored.
    pub fn upsert_record(&self, record: &BalanceRecord) -> LedgerResult<()> {
        let json = serde_json::to_vec(record)?;
        let addr = record.address.to_lowercase();
        let key = make_history_key(&addr, record.last_updated, &Uuid::new_v4());

        let write_txn = self.db.begin_write()?;
        {
            let mut history = write_txn.open_table(BALANCE_HISTORY)?;
            history.insert(key.as_slice(), json.as_slice())?;

            let mut latest = write_txn.open_table(LATEST_BALANCES)?;
            let stored_is_newer = match latest.get(addr.as_str())? {
                Some(existing) => {
                    let existing: BalanceRecord = serde_json::from_slice(existing.value())?;
                    existing.last_updated > record.last_updated
                }
                None => false,
            };
            if !stored_is_newer {
                latest.insert(addr.as_str(), json.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn list_history(&self, address: &str) -> LedgerResult<Vec<BalanceRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BALANCE_HISTORY)?;

        let start = make_prefix(address);
        let end = make_prefix_end(address);

        let mut records = Vec::new();
        for entry in table.range(start.as_slice()..end.as_slice())? {
            let (_, value) = entry?;
            records.push(serde_json::from_slice(value.value())?);
        }
        Ok(records)
    }

    pub fn get_latest(&self, address: &str) -> LedgerResult<Option<BalanceRecord>> {
        let addr = address.to_lowercase();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LATEST_BALANCES)?;
        match table.get(addr.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn check_readable(&self) -> LedgerResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(LATEST_BALANCES)?;
        Ok(())
    }

    async fn blocking<T, F>(&self, f: F) -> LedgerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(RedbBalanceLedger) -> LedgerResult<T> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || f(this))
            .await
            .map_err(|e| LedgerError::Task(e.to_string()))?
    }
}

#[async_trait]
impl BalanceLedger for RedbBalanceLedger {
    async fn upsert(
        &self,
        address: &str,
        balance_wei: &str,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let record = BalanceRecord {
            address: address.to_string(),
            balance: balance_wei.to_string(),
            last_updated: timestamp,
        };
        self.blocking(move |ledger| ledger.upsert_record(&record))
            .await
    }

    async fn history(&self, address: &str) -> LedgerResult<Vec<BalanceRecord>> {
        let address = address.to_string();
        self.blocking(move |ledger| ledger.list_history(&address))
            .await
    }

    async fn latest(&self, address: &str) -> LedgerResult<Option<BalanceRecord>> {
        let address = address.to_string();
        self.blocking(move |ledger| ledger.get_latest(&address))
            .await
    }

    async fn health_check(&self) -> LedgerResult<()> {
        self.blocking(|ledger| ledger.check_readable()).await
    }
}

// =============================================================================
// Tests
// =============================================================================
