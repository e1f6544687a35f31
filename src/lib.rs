// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Instagram-Metrics: engagement reporting for an Instagram Business Account
//!
//! This crate provides a small web service that authenticates a user via
//! Facebook OAuth, locates their linked Instagram Business Account and
//! reports engagement metrics for the most recent posts.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::GraphClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub graph: GraphClient,
}
