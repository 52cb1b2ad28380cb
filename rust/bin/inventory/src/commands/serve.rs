//! `inventory serve`: development proxy.
//!
//! Forwards every `/api/*` request (method, path, query, body, content
//! type) to the backend and relays the status and body back.

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use inventory_core::DevServerConfig;
use tracing::{debug, error, info};

#[derive(Clone)]
struct ProxyState {
    http: reqwest::Client,
    target: String,
}

/// Build the proxy router for `target` (an origin like
/// `http://127.0.0.1:5000`).
pub fn build_router(target: &str) -> Result<Router> {
    let state = ProxyState {
        http: reqwest::Client::builder().build()?,
        target: target.trim_end_matches('/').to_string(),
    };
    Ok(Router::new()
        .route("/health", get(health))
        .route("/api", any(forward))
        .route("/api/{*rest}", any(forward))
        .with_state(state))
}

pub async fn run(config: &DevServerConfig) -> Result<()> {
    let app = build_router(&config.proxy_target)?;
    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!(
        "Dev server listening on {}, proxying /api to {}",
        config.listen, config.proxy_target
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn forward(
    State(state): State<ProxyState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let url = format!("{}{}", state.target, path);
    debug!(method = %method, url = %url, "proxying");

    let mut request = state.http.request(method.clone(), &url).body(body);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        request = request.header(header::CONTENT_TYPE, content_type.clone());
    }

    let upstream = match request.send().await {
        Ok(upstream) => upstream,
        Err(e) => return bad_gateway(&method, &url, e),
    };
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let body = match upstream.bytes().await {
        Ok(body) => body,
        Err(e) => return bad_gateway(&method, &url, e),
    };

    let mut response = (status, body).into_response();
    if let Some(content_type) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}

fn bad_gateway(method: &Method, url: &str, e: reqwest::Error) -> Response {
    error!(method = %method, url = %url, "proxy error: {}", e);
    (
        StatusCode::BAD_GATEWAY,
        axum::Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::Json;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn forwards_method_query_and_body() {
        let backend = spawn(
            Router::new()
                .route(
                    "/api/products/non-composite",
                    get(|Query(q): Query<HashMap<String, String>>| async move {
                        Json(json!({"success": true, "data": q}))
                    }),
                )
                .route(
                    "/api/orders",
                    axum::routing::post(|Json(body): Json<Value>| async move {
                        (StatusCode::CREATED, Json(json!({"success": true, "data": body})))
                    }),
                ),
        )
        .await;
        let proxy = spawn(build_router(&backend).unwrap()).await;
        let http = reqwest::Client::new();

        let listed: Value = http
            .get(format!("{}/api/products/non-composite?q=bolt&limit=5", proxy))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(listed["data"], json!({"q": "bolt", "limit": "5"}));

        let created = http
            .post(format!("{}/api/orders", proxy))
            .json(&json!({"order_type": "sales"}))
            .send()
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let body: Value = created.json().await.unwrap();
        assert_eq!(body["data"], json!({"order_type": "sales"}));
    }

    #[tokio::test]
    async fn relays_error_status_and_body() {
        let backend = spawn(Router::new().route(
            "/api/products/{id}",
            get(|| async {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"})))
            }),
        ))
        .await;
        let proxy = spawn(build_router(&backend).unwrap()).await;

        let resp = reqwest::get(format!("{}/api/products/42", proxy)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"error": "boom"}));
    }

    #[tokio::test]
    async fn unreachable_backend_is_bad_gateway() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let dead = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let proxy = spawn(build_router(&dead).unwrap()).await;

        let resp = reqwest::get(format!("{}/api/orders", proxy)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
