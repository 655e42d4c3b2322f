// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and handed to constructors; nothing below `main` reads the
//! environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ETHEREUM_RPC_URL` | Upstream JSON-RPC endpoint | Required |
//! | `RPC_TIMEOUT_SECS` | Per-call upstream timeout | `10` |
//! | `CACHE_TTL_SECS` | TTL for gas price / block number entries | `30` |
//! | `CACHE_CAPACITY` | Max entries in the in-process cache | `1024` |
//! | `LEDGER_PATH` | redb file for the balance ledger | `./data/balances.redb` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable name for the upstream JSON-RPC endpoint.
pub const RPC_URL_ENV: &str = "ETHEREUM_RPC_URL";

pub const RPC_TIMEOUT_ENV: &str = "RPC_TIMEOUT_SECS";

pub const CACHE_TTL_ENV: &str = "CACHE_TTL_SECS";

pub const CACHE_CAPACITY_ENV: &str = "CACHE_CAPACITY";

/// Environment variable name for the balance ledger file.
///
/// The parent directory is created on startup if missing.
pub const LEDGER_PATH_ENV: &str = "LEDGER_PATH";

pub const HOST_ENV: &str = "HOST";

pub const PORT_ENV: &str = "PORT";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;
pub const DEFAULT_LEDGER_PATH: &str = "./data/balances.redb";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing {0} env var")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub rpc_url: String,
    pub rpc_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub ledger_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = lookup(RPC_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(RPC_URL_ENV))?;

        let rpc_timeout_secs = parse_or(&lookup, RPC_TIMEOUT_ENV, DEFAULT_RPC_TIMEOUT_SECS)?;
        let cache_ttl_secs = parse_or(&lookup, CACHE_TTL_ENV, DEFAULT_CACHE_TTL_SECS)?;
        let cache_capacity = parse_or(&lookup, CACHE_CAPACITY_ENV, DEFAULT_CACHE_CAPACITY)?;
        let port = parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?;

        if rpc_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: RPC_TIMEOUT_ENV,
                value: "0".to_string(),
            });
        }

        Ok(Self {
            rpc_url,
            rpc_timeout: Duration::from_secs(rpc_timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_capacity,
            ledger_path: lookup(LEDGER_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH)),
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_format: lookup(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(LogFormat::Pretty),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_rpc_url_set() {
        let cfg = AppConfig::from_lookup(lookup(&[(RPC_URL_ENV, "http://localhost:8545")])).unwrap();
        assert_eq!(cfg.rpc_url, "http://localhost:8545");
        assert_eq!(cfg.rpc_timeout, Duration::from_secs(10));
        assert_eq!(cfg.cache_ttl, Duration::from_secs(30));
        assert_eq!(cfg.cache_capacity, 1024);
        assert_eq!(cfg.ledger_path, PathBuf::from(DEFAULT_LEDGER_PATH));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (RPC_URL_ENV, "https://sepolia.example"),
            (RPC_TIMEOUT_ENV, "3"),
            (CACHE_TTL_ENV, " 45 "),
            (CACHE_CAPACITY_ENV, "8"),
            (LEDGER_PATH_ENV, "/tmp/ledger.redb"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (LOG_FORMAT_ENV, "JSON"),
        ]))
        .unwrap();

        assert_eq!(cfg.rpc_timeout, Duration::from_secs(3));
        assert_eq!(cfg.cache_ttl, Duration::from_secs(45));
        assert_eq!(cfg.cache_capacity, 8);
        assert_eq!(cfg.ledger_path, PathBuf::from("/tmp/ledger.redb"));
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_rpc_url_is_an_error() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing(RPC_URL_ENV))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(RPC_URL_ENV, "  ")])),
            Err(ConfigError::Missing(RPC_URL_ENV))
        );
    }

    #[test]
    fn unparseable_numbers_are_errors() {
        let err = AppConfig::from_lookup(lookup(&[
            (RPC_URL_ENV, "http://localhost:8545"),
            (PORT_ENV, "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: PORT_ENV,
                value: "eighty".to_string()
            }
        );

        let err = AppConfig::from_lookup(lookup(&[
            (RPC_URL_ENV, "http://localhost:8545"),
            (RPC_TIMEOUT_ENV, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: RPC_TIMEOUT_ENV, .. }));
    }
}
