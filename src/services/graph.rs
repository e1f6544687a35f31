// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Facebook Graph API client for the Instagram insights flow.
//!
//! Handles:
//! - OAuth code exchange and long-lived token exchange
//! - Instagram Business Account discovery via the user's pages
//! - Media listing and per-media insight retrieval
//!
//! No call is retried; any non-2xx response propagates with its status
//! and body.

use crate::error::AppError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Number of recent media items fetched for the report.
pub const DEFAULT_MEDIA_LIMIT: u32 = 5;

/// Fields requested for each media item.
const MEDIA_FIELDS: &str = "id,media_type,media_url,permalink,timestamp,caption";

/// Insight metrics requested for video posts.
const VIDEO_METRICS: &[&str] = &["engagement", "impressions", "reach", "saved", "video_views"];

/// Insight metrics requested for every other media type.
const DEFAULT_METRICS: &[&str] = &["engagement", "impressions", "reach", "saved"];

/// Metric set requested for a media type.
pub fn metrics_for(media_type: &MediaType) -> &'static [&'static str] {
    match media_type {
        MediaType::Video => VIDEO_METRICS,
        _ => DEFAULT_METRICS,
    }
}

/// Facebook Graph API client.
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_secret: String,
}

impl GraphClient {
    /// Create a new Graph client with app credentials.
    pub fn new(app_id: String, app_secret: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            app_id,
            app_secret,
        }
    }

    /// Exchange an authorization code for a short-lived user access token.
    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, AppError> {
        let url = format!("{}/oauth/access_token", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("client_id", self.app_id.as_str()),
                ("client_secret", self.app_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::GraphApi(format!("Token exchange request failed: {}", e)))?;

        let token: TokenResponse = self.check_response_json(response).await?;
        Ok(token.access_token)
    }

    /// Exchange a short-lived token for a long-lived one (valid ~60 days).
    pub async fn get_long_lived_token(&self, short_token: &str) -> Result<String, AppError> {
        let url = format!("{}/oauth/access_token", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("grant_type", "fb_exchange_token"),
                ("client_id", self.app_id.as_str()),
                ("client_secret", self.app_secret.as_str()),
                ("fb_exchange_token", short_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::GraphApi(format!("Token exchange request failed: {}", e)))?;

        let token: TokenResponse = self.check_response_json(response).await?;
        Ok(token.access_token)
    }

    /// Find the first of the user's pages with a linked Instagram Business
    /// Account.
    ///
    /// Pages are scanned in the order the platform returns them and the scan
    /// stops at the first match. `None` means no page qualifies; that is a
    /// normal outcome, not an error.
    pub async fn get_instagram_account(
        &self,
        user_token: &str,
    ) -> Result<Option<InstagramAccount>, AppError> {
        let url = format!("{}/me/accounts", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("access_token", user_token)])
            .send()
            .await
            .map_err(|e| AppError::GraphApi(e.to_string()))?;

        let pages: PageList = self.check_response_json(response).await?;

        for page in pages.data {
            let url = format!("{}/{}", self.base_url, page.id);

            let response = self
                .http
                .get(&url)
                .query(&[
                    ("fields", "instagram_business_account"),
                    ("access_token", page.access_token.as_str()),
                ])
                .send()
                .await
                .map_err(|e| AppError::GraphApi(e.to_string()))?;

            let details: PageDetails = self.check_response_json(response).await?;

            if let Some(linked) = details.instagram_business_account {
                tracing::debug!(page_id = %page.id, account_id = %linked.id, "Linked Instagram account found");
                return Ok(Some(InstagramAccount {
                    account_id: linked.id,
                    page_access_token: page.access_token,
                }));
            }
        }

        Ok(None)
    }

    /// Fetch up to `limit` most recent media items, platform order preserved.
    ///
    /// An account with no posts yields an empty list.
    pub async fn get_latest_media(
        &self,
        account_id: &str,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<MediaItem>, AppError> {
        let url = format!("{}/{}/media", self.base_url, account_id);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("fields", MEDIA_FIELDS.to_string()),
                ("limit", limit.to_string()),
                ("access_token", access_token.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::GraphApi(e.to_string()))?;

        let media: MediaList = self.check_response_json(response).await?;
        Ok(media.data)
    }

    /// Fetch insights for one media item, flattened to metric name → value.
    ///
    /// The metric set depends on the media type; see [`metrics_for`].
    /// Metrics absent from the response are absent from the map.
    pub async fn get_media_insights(
        &self,
        media_id: &str,
        access_token: &str,
        media_type: &MediaType,
    ) -> Result<HashMap<String, u64>, AppError> {
        let url = format!("{}/{}/insights", self.base_url, media_id);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("metric", metrics_for(media_type).join(",")),
                ("access_token", access_token.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::GraphApi(e.to_string()))?;

        let insights: InsightList = self.check_response_json(response).await?;
        Ok(flatten_insights(insights.data))
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GraphApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GraphApi(format!("JSON parse error: {}", e)))
    }
}

/// Flatten insight entries to metric name → first reported value.
///
/// Each metric carries a list of period values; the first one is the figure
/// reported. The period itself is not inspected. Entries with no values are
/// skipped.
fn flatten_insights(data: Vec<InsightEntry>) -> HashMap<String, u64> {
    let mut flattened = HashMap::new();
    for entry in data {
        if let Some(first) = entry.values.into_iter().next() {
            flattened.insert(entry.name, first.value);
        }
    }
    flattened
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Page listing from `/me/accounts`.
#[derive(Debug, Clone, Deserialize)]
struct PageList {
    #[serde(default)]
    data: Vec<Page>,
}

/// One Facebook page with its page-scoped access token.
#[derive(Debug, Clone, Deserialize)]
struct Page {
    id: String,
    access_token: String,
}

/// Page detail lookup for the linked Instagram account.
#[derive(Debug, Clone, Deserialize)]
struct PageDetails {
    instagram_business_account: Option<IgAccountRef>,
}

#[derive(Debug, Clone, Deserialize)]
struct IgAccountRef {
    id: String,
}

/// Resolved Instagram Business Account and the page token that grants
/// access to it.
#[derive(Debug, Clone)]
pub struct InstagramAccount {
    pub account_id: String,
    pub page_access_token: String,
}

/// Media listing from `/{account_id}/media`.
#[derive(Debug, Clone, Deserialize)]
struct MediaList {
    #[serde(default)]
    data: Vec<MediaItem>,
}

/// One Instagram media item.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub media_type: MediaType,
    pub media_url: Option<String>,
    pub permalink: Option<String>,
    pub timestamp: Option<String>,
    pub caption: Option<String>,
}

/// Media type as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum MediaType {
    #[serde(rename = "IMAGE")]
    Image,
    #[serde(rename = "VIDEO")]
    Video,
    #[serde(rename = "CAROUSEL_ALBUM")]
    CarouselAlbum,
    /// Any type this client does not know about yet
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Image => write!(f, "IMAGE"),
            MediaType::Video => write!(f, "VIDEO"),
            MediaType::CarouselAlbum => write!(f, "CAROUSEL_ALBUM"),
            MediaType::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Insights listing shaped `{data: [{name, values: [{value}]}]}`.
#[derive(Debug, Clone, Deserialize)]
struct InsightList {
    #[serde(default)]
    data: Vec<InsightEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct InsightEntry {
    name: String,
    #[serde(default)]
    values: Vec<InsightValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct InsightValue {
    value: u64,
}
