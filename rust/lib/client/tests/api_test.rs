//! End-to-end tests for the REST client against an in-process server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use inventory_client::api::{BomQuery, NonCompositeQuery, TransactionQuery};
use inventory_client::{ApiClient, ApiError, Payload};
use inventory_core::{ApiConfig, Phase};
use serde_json::{json, Value};

// =====================================================================
// Test server setup
// =====================================================================

/// Serve `routes` under `/api` on a random port and return a client
/// pointed at it.
async fn serve(routes: Router) -> ApiClient {
    serve_with(routes, 10).await
}

async fn serve_with(routes: Router, timeout_secs: u64) -> ApiClient {
    let app = Router::new().nest("/api", routes);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ApiConfig {
        server: format!("http://{}", addr),
        timeout_secs,
        ..ApiConfig::default()
    };
    ApiClient::new(&config).unwrap()
}

async fn echo_query(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "query": params }))
}

// =====================================================================
// Envelope handling
// =====================================================================

#[tokio::test]
async fn envelope_body_resolves_to_whole_mapping() {
    let client = serve(Router::new().route(
        "/products/{id}",
        get(|Path(id): Path<i64>| async move {
            Json(json!({"success": true, "data": {"id": id, "name": "M3 螺丝"}}))
        }),
    ))
    .await;

    let payload = client.products().get_product(42).await.unwrap();
    assert_eq!(
        payload,
        Payload::Json(json!({"success": true, "data": {"id": 42, "name": "M3 螺丝"}}))
    );
}

#[tokio::test]
async fn plain_body_resolves_unchanged() {
    let client = serve(Router::new().route(
        "/products/{id}",
        get(|Path(id): Path<i64>| async move { Json(json!({"id": id, "name": "x"})) }),
    ))
    .await;

    let payload = client.products().get_product(42).await.unwrap();
    assert_eq!(payload.into_json(), Some(json!({"id": 42, "name": "x"})));
}

#[tokio::test]
async fn empty_body_resolves_to_raw_response() {
    let client = serve(Router::new().route(
        "/orders/{id}",
        delete(|| async { StatusCode::NO_CONTENT }),
    ))
    .await;

    match client.orders().delete_order(9).await.unwrap() {
        Payload::Raw(raw) => {
            assert_eq!(raw.status, 204);
            assert!(raw.body.is_empty());
        }
        other => panic!("expected raw response, got {:?}", other),
    }
}

// =====================================================================
// Failures
// =====================================================================

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let client = serve(Router::new().route(
        "/products/{id}",
        get(|| async {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"})))
        }),
    ))
    .await;

    let err = client.products().get_product(42).await.unwrap_err();
    match &err {
        ApiError::Server { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, &json!({"error": "boom"}));
        }
        other => panic!("expected server error, got {:?}", other),
    }
    assert_eq!(err.record().origin_status, Some(500));
    assert_eq!(err.phase(), Phase::Response);
}

#[tokio::test]
async fn envelope_with_error_status_is_still_a_failure() {
    let client = serve(Router::new().route(
        "/inventory/check",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "数量必须大于0"})),
            )
        }),
    ))
    .await;

    let err = client
        .inventory()
        .check_inventory(&json!({"product_id": 1, "quantity": 0}))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.body().unwrap()["message"], "数量必须大于0");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&ApiConfig {
        server: format!("http://{}", addr),
        ..ApiConfig::default()
    })
    .unwrap();

    let err = client.orders().get_orders().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn slow_server_hits_client_timeout() {
    let client = serve_with(
        Router::new().route(
            "/reports/cost-analysis",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({}))
            }),
        ),
        1,
    )
    .await;

    let err = client.reports().get_cost_analysis().await.unwrap_err();
    assert!(err.is_timeout(), "got {:?}", err);
}

#[tokio::test]
async fn relative_base_url_is_a_request_error() {
    let client = ApiClient::new(&ApiConfig {
        server: String::new(),
        ..ApiConfig::default()
    })
    .unwrap();

    let err = client.categories().get_categories().await.unwrap_err();
    assert!(matches!(err, ApiError::Request { .. }), "got {:?}", err);
    assert_eq!(err.phase(), Phase::Request);
}

// =====================================================================
// Request shaping
// =====================================================================

#[tokio::test]
async fn query_parameters_are_sent() {
    let client = serve(
        Router::new()
            .route("/products/non-composite", get(echo_query))
            .route("/bom", get(echo_query))
            .route("/transactions", get(echo_query)),
    )
    .await;

    let products = client
        .products()
        .get_non_composite_products(&NonCompositeQuery {
            q: Some("bolt".to_string()),
            limit: Some(5),
        })
        .await
        .unwrap();
    assert_eq!(
        products.into_json().unwrap()["query"],
        json!({"q": "bolt", "limit": "5"})
    );

    let bom = client
        .bom()
        .get_bom(&BomQuery {
            product_id: Some(3),
            expand: Some(true),
            shipping_cost: None,
        })
        .await
        .unwrap();
    assert_eq!(
        bom.into_json().unwrap()["query"],
        json!({"product_id": "3", "expand": "true"})
    );

    let ledger = client
        .transactions()
        .get_transactions(&TransactionQuery {
            product_id: None,
            kind: Some("out".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(ledger.into_json().unwrap()["query"], json!({"type": "out"}));
}

#[tokio::test]
async fn json_body_and_content_type_are_sent() {
    let client = serve(Router::new().route(
        "/orders",
        post(|headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            (
                StatusCode::CREATED,
                Json(json!({"success": true, "data": body, "content_type": content_type})),
            )
        }),
    ))
    .await;

    let order = json!({"order_type": "sales", "items": [{"product_id": 1, "quantity": 2}]});
    let payload = client.orders().create_order(&order).await.unwrap();
    let body = payload.into_json().unwrap();
    assert_eq!(body["data"], order);
    assert_eq!(body["content_type"], "application/json");
}

#[tokio::test]
async fn bom_export_resolves_to_bytes() {
    let client = serve(Router::new().route(
        "/reports/bom/export",
        get(|| async {
            (
                [(
                    header::CONTENT_TYPE,
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                )],
                vec![0x50u8, 0x4b, 0x03, 0x04],
            )
                .into_response()
        }),
    ))
    .await;

    let payload = client.reports().export_bom_excel().await.unwrap();
    assert_eq!(payload, Payload::Binary(bytes::Bytes::from_static(&[0x50, 0x4b, 0x03, 0x04])));
}

#[tokio::test]
async fn repeated_get_hits_server_each_time() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let client = serve(Router::new().route(
        "/transactions/recent",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(json!({"success": true, "data": []}))
            }
        }),
    ))
    .await;

    let first = client.transactions().get_recent_transactions().await.unwrap();
    let second = client.transactions().get_recent_transactions().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_call_is_not_retried() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let client = serve(Router::new().route(
        "/production",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::SERVICE_UNAVAILABLE
            }
        }),
    ))
    .await;

    let err = client
        .production()
        .create_production_plan(&json!({"product_id": 1, "quantity": 10}))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.body(), Some(&Value::Null));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
