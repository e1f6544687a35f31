// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: app construction and an in-process stub of the
//! Facebook Graph API.
//!
//! The stub is a small axum router bound to an ephemeral port. It serves
//! scripted fixture data and records every request it receives so tests can
//! assert on call order and parameters.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use instagram_metrics::config::Config;
use instagram_metrics::routes::create_router;
use instagram_metrics::services::GraphClient;
use instagram_metrics::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scripted upstream behavior for one test.
#[derive(Clone, Default)]
pub struct GraphFixture {
    /// Pages returned by `/me/accounts`
    pub pages: Vec<Value>,
    /// Page id → page detail body
    pub page_details: HashMap<String, Value>,
    /// Media items returned for any account
    pub media: Vec<Value>,
    /// Media id → insights `data` array
    pub insights: HashMap<String, Value>,
    /// Force the token endpoint to fail with this status
    pub token_status: Option<u16>,
    /// Override the token endpoint response body
    pub token_body: Option<Value>,
}

/// One recorded upstream request.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct MockGraph {
    fixture: GraphFixture,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockGraph {
    /// Requests recorded for the given path, in arrival order.
    #[allow(dead_code)]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

fn record(state: &MockGraph, path: String, query: &HashMap<String, String>) {
    state.requests.lock().unwrap().push(RecordedRequest {
        path,
        query: query.clone(),
    });
}

async fn token_handler(
    State(state): State<MockGraph>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    record(&state, "/oauth/access_token".to_string(), &query);

    if let Some(status) = state.fixture.token_status {
        return (
            StatusCode::from_u16(status).unwrap(),
            Json(json!({"error": {"message": "upstream rejected the request"}})),
        );
    }

    let body = if let Some(body) = &state.fixture.token_body {
        body.clone()
    } else if query.contains_key("fb_exchange_token") {
        json!({"access_token": "L1"})
    } else {
        json!({"access_token": "S1"})
    };

    (StatusCode::OK, Json(body))
}

async fn accounts_handler(
    State(state): State<MockGraph>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&state, "/me/accounts".to_string(), &query);
    Json(json!({"data": state.fixture.pages}))
}

async fn page_handler(
    State(state): State<MockGraph>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&state, format!("/{}", id), &query);

    let body = state
        .fixture
        .page_details
        .get(&id)
        .cloned()
        .unwrap_or_else(|| json!({"id": id}));
    Json(body)
}

async fn media_handler(
    State(state): State<MockGraph>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&state, format!("/{}/media", id), &query);

    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(state.fixture.media.len());
    let items: Vec<Value> = state.fixture.media.iter().take(limit).cloned().collect();
    Json(json!({"data": items}))
}

async fn insights_handler(
    State(state): State<MockGraph>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&state, format!("/{}/insights", id), &query);

    let data = state
        .fixture
        .insights
        .get(&id)
        .cloned()
        .unwrap_or_else(|| json!([]));
    Json(json!({"data": data}))
}

/// Start the Graph API stub on an ephemeral port.
///
/// Returns the base URL to point a `GraphClient` at, plus the handle for
/// request assertions.
pub async fn spawn_mock_graph(fixture: GraphFixture) -> (String, MockGraph) {
    let state = MockGraph {
        fixture,
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let router = Router::new()
        .route("/oauth/access_token", get(token_handler))
        .route("/me/accounts", get(accounts_handler))
        .route("/{id}", get(page_handler))
        .route("/{id}/media", get(media_handler))
        .route("/{id}/insights", get(insights_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

/// Graph client pointed at the stub.
#[allow(dead_code)]
pub fn test_client(base_url: &str) -> GraphClient {
    let config = Config::test_default();
    GraphClient::new(
        config.facebook_app_id,
        config.facebook_app_secret,
        base_url.to_string(),
    )
}

/// Create a test app with the Graph client pointed at the stub.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(graph_base: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.graph_api_base = graph_base.to_string();

    let graph = GraphClient::new(
        config.facebook_app_id.clone(),
        config.facebook_app_secret.clone(),
        config.graph_api_base.clone(),
    );

    let state = Arc::new(AppState { config, graph });
    (create_router(state.clone()), state)
}
