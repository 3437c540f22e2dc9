//! Data API response types.
//!
//! Only the fields the pipeline consumes are modeled; everything else in the
//! API payloads is ignored by serde.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Public output types
// ---------------------------------------------------------------------------

/// Channel metadata as consumed by the cache layer.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub channel_id: String,
    pub title: String,
    pub avatar_url: Option<String>,
    pub subscriber_count: Option<i64>,
    pub uploads_playlist: String,
}

/// One video from a channel's recent uploads, already filtered and parsed.
#[derive(Debug, Clone)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub view_count: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub duration_seconds: i32,
}

// ---------------------------------------------------------------------------
// channels.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelItem {
    pub snippet: ChannelSnippet,
    #[serde(rename = "contentDetails")]
    pub content_details: ChannelContentDetails,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists")]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelatedPlaylists {
    pub uploads: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelStatistics {
    #[serde(rename = "subscriberCount", default)]
    pub subscriber_count: Option<String>,
}

// ---------------------------------------------------------------------------
// playlistItems.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
    #[serde(rename = "contentDetails")]
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItemSnippet {
    pub title: String,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItemContentDetails {
    #[serde(rename = "videoId")]
    pub video_id: String,
    #[serde(rename = "videoPublishedAt", default)]
    pub video_published_at: Option<String>,
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoItem {
    pub id: String,
    #[serde(rename = "contentDetails")]
    pub content_details: VideoContentDetails,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoContentDetails {
    pub duration: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoStatistics {
    #[serde(rename = "viewCount", default)]
    pub view_count: Option<String>,
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

/// Picks the best-quality thumbnail URL from an API thumbnail map.
///
/// Priority: maxres > high > medium > default.
pub(crate) fn best_thumbnail(thumbnails: &HashMap<String, Thumbnail>) -> String {
    for quality in ["maxres", "high", "medium", "default"] {
        if let Some(thumb) = thumbnails.get(quality) {
            return thumb.url.clone();
        }
    }
    String::new()
}
