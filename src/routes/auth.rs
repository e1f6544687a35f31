// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Facebook OAuth routes and the engagement report flow.

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::PostReport;
use crate::services::graph::DEFAULT_MEDIA_LIMIT;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
}

/// OAuth scopes required for reading page and Instagram insight data.
const OAUTH_SCOPES: &str =
    "instagram_basic,instagram_manage_insights,pages_show_list,pages_read_engagement";

/// Build the Facebook authorization URL for this deployment.
fn authorization_url(app_id: &str, redirect_uri: &str) -> String {
    format!(
        "https://www.facebook.com/v19.0/dialog/oauth?\
         client_id={}&\
         redirect_uri={}&\
         scope={}&\
         response_type=code",
        app_id,
        urlencoding::encode(redirect_uri),
        OAUTH_SCOPES
    )
}

/// Login page with a clickable authorization link.
async fn login(State(state): State<Arc<AppState>>) -> Html<String> {
    let auth_url = authorization_url(&state.config.facebook_app_id, &state.config.redirect_uri);

    tracing::info!(
        client_id = %state.config.facebook_app_id,
        "Starting OAuth flow"
    );

    Html(format!(
        r#"<html>
    <head><title>Instagram Login</title></head>
    <body>
        <h2>Click the link below to authenticate with Instagram:</h2>
        <p><a href="{}">Login with Facebook/Instagram</a></p>
    </body>
</html>"#,
        auth_url
    ))
}

/// Query parameters for the OAuth callback.
#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// OAuth callback - run the full report flow and acknowledge.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Html<String>> {
    // The platform reports a denied or failed consent via query params
    if let Some(error) = params.error {
        let detail = params.error_description.unwrap_or_else(|| error.clone());
        tracing::warn!(error = %error, "OAuth error from Facebook");
        return Err(AppError::BadRequest(format!("OAuth failed: {}", detail)));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let reports = run_report_flow(&state, &code).await?;

    let report_block = reports
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Html(format!(
        r#"<html>
    <head><title>Success</title></head>
    <body>
        <h2>Success!</h2>
        <p>Engagement metrics for the latest {} posts:</p>
        <pre>{}</pre>
        <p><a href="/">Back to home</a></p>
    </body>
</html>"#,
        reports.len(),
        report_block
    )))
}

/// Drive the report flow: token chain, account discovery, media listing,
/// per-post insights.
///
/// Steps run strictly in order; the first client error aborts the rest.
async fn run_report_flow(state: &Arc<AppState>, code: &str) -> Result<Vec<PostReport>> {
    let graph = &state.graph;

    tracing::info!("Exchanging authorization code for access token");
    let short_token = graph
        .exchange_code_for_token(code, &state.config.redirect_uri)
        .await?;
    let access_token = graph.get_long_lived_token(&short_token).await?;
    tracing::info!("Got long-lived token (valid for 60 days)");

    tracing::info!("Resolving Instagram Business Account");
    let account = graph
        .get_instagram_account(&access_token)
        .await?
        .ok_or_else(|| AppError::NotFound("No Instagram Business Account found".to_string()))?;
    tracing::info!(account_id = %account.account_id, "Instagram account resolved");

    let media = graph
        .get_latest_media(
            &account.account_id,
            &account.page_access_token,
            DEFAULT_MEDIA_LIMIT,
        )
        .await?;
    tracing::info!(count = media.len(), "Fetched latest posts");

    let mut reports = Vec::with_capacity(media.len());
    for (i, item) in media.iter().enumerate() {
        let insights = graph
            .get_media_insights(&item.id, &account.page_access_token, &item.media_type)
            .await?;

        let report = PostReport::from_insights(i + 1, item, &insights);
        tracing::info!(media_id = %item.id, "Engagement metrics\n{}", report);
        reports.push(report);
    }

    tracing::info!(posts = reports.len(), "Engagement report complete");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_encodes_redirect_uri() {
        let url = authorization_url("12345", "http://localhost:8080/auth/callback");

        assert!(url.starts_with("https://www.facebook.com/v19.0/dialog/oauth?"));
        assert!(url.contains("client_id=12345"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fcallback"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn test_authorization_url_requests_insight_scopes() {
        let url = authorization_url("12345", "http://localhost:8080/auth/callback");

        assert!(url.contains("scope=instagram_basic,instagram_manage_insights,"));
        assert!(url.contains("pages_show_list"));
        assert!(url.contains("pages_read_engagement"));
    }
}
