// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - outbound API clients.

pub mod graph;

pub use graph::{GraphClient, InstagramAccount, MediaItem, MediaType};
