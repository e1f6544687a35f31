// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-post engagement report assembled from a media item and its insights.

use std::collections::HashMap;
use std::fmt;

use crate::services::graph::{MediaItem, MediaType};

/// Maximum caption length shown in a report before truncation.
const CAPTION_LIMIT: usize = 100;

/// Engagement report for one media item.
#[derive(Debug, Clone)]
pub struct PostReport {
    /// 1-based position in the fetched media list
    pub index: usize,
    /// Media type (IMAGE, VIDEO, CAROUSEL_ALBUM, ...)
    pub media_type: MediaType,
    /// Post timestamp as reported by the platform
    pub timestamp: Option<String>,
    /// Permalink to the post
    pub permalink: Option<String>,
    /// Caption, truncated for display
    pub caption: Option<String>,
    /// Total engagement actions
    pub engagement: u64,
    /// Impression count
    pub impressions: u64,
    /// Unique accounts reached
    pub reach: u64,
    /// Save count
    pub saved: u64,
    /// View count, videos only
    pub video_views: Option<u64>,
}

impl PostReport {
    /// Build a report from a media item and its flattened insight map.
    /// Metrics missing from the map default to zero.
    pub fn from_insights(
        index: usize,
        media: &MediaItem,
        insights: &HashMap<String, u64>,
    ) -> Self {
        let metric = |name: &str| insights.get(name).copied().unwrap_or(0);

        Self {
            index,
            media_type: media.media_type.clone(),
            timestamp: media.timestamp.clone(),
            permalink: media.permalink.clone(),
            caption: media.caption.as_deref().map(truncate_caption),
            engagement: metric("engagement"),
            impressions: metric("impressions"),
            reach: metric("reach"),
            saved: metric("saved"),
            video_views: (media.media_type == MediaType::Video).then(|| metric("video_views")),
        }
    }

    /// Engagement rate as a percentage of reach.
    ///
    /// Undefined when nothing was reached.
    pub fn engagement_rate(&self) -> Option<f64> {
        if self.reach > 0 {
            Some(self.engagement as f64 / self.reach as f64 * 100.0)
        } else {
            None
        }
    }
}

impl fmt::Display for PostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "POST {}:", self.index)?;
        writeln!(f, "  Type: {}", self.media_type)?;
        writeln!(
            f,
            "  Posted: {}",
            self.timestamp
                .as_deref()
                .map(display_timestamp)
                .unwrap_or_else(|| "N/A".to_string())
        )?;
        writeln!(f, "  URL: {}", self.permalink.as_deref().unwrap_or("N/A"))?;
        if let Some(caption) = &self.caption {
            writeln!(f, "  Caption: {}", caption)?;
        }
        writeln!(f, "  Engagement: {}", self.engagement)?;
        writeln!(f, "  Reach: {} accounts", self.reach)?;
        writeln!(f, "  Impressions: {}", self.impressions)?;
        writeln!(f, "  Saved: {}", self.saved)?;
        if let Some(views) = self.video_views {
            writeln!(f, "  Video Views: {}", views)?;
        }
        if let Some(rate) = self.engagement_rate() {
            writeln!(f, "  Engagement Rate: {:.2}%", rate)?;
        }
        Ok(())
    }
}

/// Truncate a caption to the first 100 characters, appending an ellipsis
/// when anything was cut. Counts characters, not bytes.
pub fn truncate_caption(caption: &str) -> String {
    if caption.chars().count() <= CAPTION_LIMIT {
        caption.to_string()
    } else {
        let head: String = caption.chars().take(CAPTION_LIMIT).collect();
        format!("{}...", head)
    }
}

/// Render a platform timestamp in a friendlier form, falling back to the
/// raw value when it does not parse.
fn display_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .map(|dt| {
            dt.with_timezone(&chrono::Utc)
                .format("%Y-%m-%d %H:%M UTC")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}
