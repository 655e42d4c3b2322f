// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::aggregator::AggregatorError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

/// JSON error body returned by every endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Invalid Ethereum address")]
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<AggregatorError> for ApiError {
    fn from(err: AggregatorError) -> Self {
        match err {
            AggregatorError::InvalidInput(_) | AggregatorError::UpstreamFailure(_) => {
                ApiError::bad_request(err.to_string())
            }
            AggregatorError::PersistenceFailure(ref e) => {
                tracing::error!(error = %e, "Balance ledger read failed");
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
