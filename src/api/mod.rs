// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorBody,
    models::{AddressInfo, BalanceRecord, GasPrice, NativeBalance},
    state::AppState,
};

pub mod health;
pub mod info;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/info/{address}", get(info::get_address_info))
        .route("/history/{address}", get(info::get_balance_history))
        .route("/balance/{address}/latest", get(info::get_latest_balance))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        info::get_address_info,
        info::get_balance_history,
        info::get_latest_balance,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            AddressInfo,
            BalanceRecord,
            GasPrice,
            NativeBalance,
            ErrorBody,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Address", description = "Address snapshots and balance history"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::tests::{Harness, DEAD};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(h: &Harness) -> Router {
        router(AppState::new(h.service.clone()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let h = Harness::standard();
        let _ = app(&h).into_make_service();
    }

    #[tokio::test]
    async fn info_returns_snapshot_json() {
        let h = Harness::standard();
        let (status, body) = get_json(app(&h), &format!("/info/{DEAD}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "address": DEAD,
                "gasPrice": { "wei": "20000000000", "gwei": "20.0" },
                "blockNumber": 12345678,
                "balance": { "wei": "1000000000000000000", "ether": "1.0" }
            })
        );
    }

    #[tokio::test]
    async fn info_rejects_malformed_address() {
        let h = Harness::standard();
        let (status, body) = get_json(app(&h), "/info/0x1234").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid Ethereum address" }));
        assert_eq!(h.rpc.total_calls(), 0);
    }

    #[tokio::test]
    async fn info_maps_upstream_failure_to_bad_request() {
        let h = Harness::standard();
        h.rpc.set_fail_balance(true);
        let (status, body) = get_json(app(&h), &format!("/info/{DEAD}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(
            message.starts_with("Failed to fetch Ethereum data: "),
            "unexpected message: {message}"
        );
        assert!(h.ledger.records().is_empty());
    }

    #[tokio::test]
    async fn history_lists_recorded_balances() {
        let h = Harness::standard();
        let (status, _) = get_json(app(&h), &format!("/info/{DEAD}")).await;
        assert_eq!(status, StatusCode::OK);

        let lower = DEAD.to_lowercase();
        let (status, body) = get_json(app(&h), &format!("/history/{lower}")).await;
        assert_eq!(status, StatusCode::OK);

        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["address"], DEAD);
        assert_eq!(entries[0]["balance"], "1000000000000000000");
        assert!(entries[0]["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn history_is_empty_array_for_unknown_address() {
        let h = Harness::standard();
        let (status, body) = get_json(app(&h), &format!("/history/{DEAD}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn history_ledger_failure_is_internal_error() {
        let h = Harness::standard();
        h.ledger.set_fail_reads(true);
        let (status, body) = get_json(app(&h), &format!("/history/{DEAD}")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn latest_balance_is_404_until_recorded() {
        let h = Harness::standard();
        let uri = format!("/balance/{DEAD}/latest");

        let (status, body) = get_json(app(&h), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "No balance recorded for this address" }));

        get_json(app(&h), &format!("/info/{DEAD}")).await;

        let (status, body) = get_json(app(&h), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], "1000000000000000000");
    }

    #[tokio::test]
    async fn health_probes_reflect_ledger_state() {
        let h = Harness::standard();

        let (status, body) = get_json(app(&h), "/health/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        let (status, body) = get_json(app(&h), "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["ledger"], "ok");

        h.ledger.set_fail_reads(true);
        let (status, body) = get_json(app(&h), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"]["ledger"], "unavailable");

        // liveness ignores dependencies
        let (status, _) = get_json(app(&h), "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/info/{address}",
            "/history/{address}",
            "/balance/{address}/latest",
            "/health/live",
            "/health/ready",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
