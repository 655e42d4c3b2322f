// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Address snapshot and balance ledger endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{AddressInfo, BalanceRecord},
    state::AppState,
};

/// Live balance, gas price and block number for an address.
///
/// Every successful call appends the observed balance to the ledger.
#[utoipa::path(
    get,
    path = "/info/{address}",
    tag = "Address",
    params(
        ("address" = String, Path, description = "0x-prefixed 20-byte hex address")
    ),
    responses(
        (status = 200, description = "Address snapshot", body = AddressInfo),
        (status = 400, description = "Invalid address or upstream failure", body = ErrorBody)
    )
)]
pub async fn get_address_info(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<AddressInfo>, ApiError> {
    let info = state.service.get_address_info(&address).await?;
    Ok(Json(info))
}

/// Recorded balances for an address, most recent first.
#[utoipa::path(
    get,
    path = "/history/{address}",
    tag = "Address",
    params(
        ("address" = String, Path, description = "0x-prefixed 20-byte hex address")
    ),
    responses(
        (status = 200, description = "Balance history (possibly empty)", body = [BalanceRecord]),
        (status = 400, description = "Invalid address", body = ErrorBody),
        (status = 500, description = "Ledger unavailable", body = ErrorBody)
    )
)]
pub async fn get_balance_history(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Vec<BalanceRecord>>, ApiError> {
    let history = state.service.get_balance_history(&address).await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/balance/{address}/latest",
    tag = "Address",
    params(
        ("address" = String, Path, description = "0x-prefixed 20-byte hex address")
    ),
    responses(
        (status = 200, description = "Most recent recorded balance", body = BalanceRecord),
        (status = 400, description = "Invalid address", body = ErrorBody),
        (status = 404, description = "No balance recorded for this address", body = ErrorBody),
        (status = 500, description = "Ledger unavailable", body = ErrorBody)
    )
)]
pub async fn get_latest_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceRecord>, ApiError> {
    state
        .service
        .get_latest_balance(&address)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No balance recorded for this address"))
}
