// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Instagram-Metrics API Server
//!
//! Authenticates a user via Facebook OAuth, locates their linked Instagram
//! Business Account and reports engagement metrics for the latest posts.

use instagram_metrics::{config::Config, services::GraphClient, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Instagram-Metrics API");

    // Initialize the Graph API client with app credentials
    let graph = GraphClient::new(
        config.facebook_app_id.clone(),
        config.facebook_app_secret.clone(),
        config.graph_api_base.clone(),
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        graph,
    });

    // Build router
    let app = instagram_metrics::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("instagram_metrics=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
