//! HTTP client for the video-platform Data API (v3-style, key auth).
//!
//! Two endpoints drive the metadata path: `channels` resolves the uploads
//! playlist, then `playlistItems` + `videos` yield recent uploads with
//! durations and view counts.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::duration::parse_iso8601_duration;
use crate::error::YoutubeError;
use crate::types::{
    best_thumbnail, ChannelInfo, ChannelListResponse, PlaylistItemsResponse, VideoListResponse,
    VideoRecord,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Client for the metadata source.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::UnexpectedStatus`] if
    /// `base_url` is not a valid URL base.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tubeforge/0.1 (creator-tooling)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|_| YoutubeError::UnexpectedStatus {
            status: 0,
            url: normalised,
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches channel metadata: display name, avatar, subscriber count, and
    /// the uploads playlist id.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::ChannelNotFound`] if the API returns no items.
    /// - [`YoutubeError::Http`] / [`YoutubeError::UnexpectedStatus`] on
    ///   transport failures.
    /// - [`YoutubeError::Deserialize`] if the response shape is unexpected.
    pub async fn get_channel_info(&self, channel_id: &str) -> Result<ChannelInfo, YoutubeError> {
        let url = self.build_url(
            "channels",
            &[("part", "snippet,contentDetails,statistics"), ("id", channel_id)],
        );
        let response: ChannelListResponse = self
            .request_json(url, &format!("channels(id={channel_id})"))
            .await?;

        let Some(item) = response.items.into_iter().next() else {
            return Err(YoutubeError::ChannelNotFound {
                channel_id: channel_id.to_string(),
            });
        };

        let avatar_url = {
            let url = best_thumbnail(&item.snippet.thumbnails);
            if url.is_empty() {
                None
            } else {
                Some(url)
            }
        };
        let subscriber_count = item
            .statistics
            .and_then(|s| s.subscriber_count)
            .and_then(|s| s.parse::<i64>().ok());

        Ok(ChannelInfo {
            channel_id: channel_id.to_string(),
            title: item.snippet.title,
            avatar_url,
            subscriber_count,
            uploads_playlist: item.content_details.related_playlists.uploads,
        })
    }

    /// Lists a channel's recent uploads, filtered to long-form videos
    /// published within the lookback window.
    ///
    /// `since_days <= 0` disables the date filter; `min_duration_secs <= 0`
    /// disables the duration filter.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`YoutubeClient::get_channel_info`];
    /// a channel with no parseable uploads yields an empty list, not an error.
    pub async fn list_recent_videos(
        &self,
        channel_id: &str,
        since_days: i64,
        min_duration_secs: i32,
        max_results: u32,
    ) -> Result<Vec<VideoRecord>, YoutubeError> {
        let channel = self.get_channel_info(channel_id).await?;

        let url = self.build_url(
            "playlistItems",
            &[
                ("part", "snippet,contentDetails"),
                ("playlistId", &channel.uploads_playlist),
                ("maxResults", &max_results.to_string()),
            ],
        );
        let playlist: PlaylistItemsResponse = self
            .request_json(url, &format!("playlistItems(channel={channel_id})"))
            .await?;

        if playlist.items.is_empty() {
            return Ok(Vec::new());
        }

        // Collect per-video metadata from the playlist page, then one
        // details call for durations and view counts.
        let mut order: Vec<String> = Vec::with_capacity(playlist.items.len());
        let mut meta = std::collections::HashMap::new();
        for item in playlist.items {
            let video_id = item.content_details.video_id.clone();
            let published = item
                .content_details
                .video_published_at
                .or(item.snippet.published_at);
            order.push(video_id.clone());
            meta.insert(
                video_id,
                (item.snippet.title, published, best_thumbnail(&item.snippet.thumbnails)),
            );
        }

        let ids = order.join(",");
        let url = self.build_url(
            "videos",
            &[("part", "contentDetails,statistics"), ("id", &ids)],
        );
        let details: VideoListResponse = self
            .request_json(url, &format!("videos(channel={channel_id})"))
            .await?;

        let cutoff = (since_days > 0).then(|| Utc::now() - chrono::Duration::days(since_days));

        let mut records = Vec::new();
        for item in details.items {
            let Some((title, published_raw, thumbnail_url)) = meta.remove(&item.id) else {
                continue;
            };

            let duration_seconds = parse_iso8601_duration(&item.content_details.duration);
            if min_duration_secs > 0 && duration_seconds < min_duration_secs {
                continue;
            }

            let published_at = published_raw.as_deref().and_then(parse_timestamp);
            if let (Some(cutoff), Some(published_at)) = (cutoff, published_at) {
                if published_at < cutoff {
                    continue;
                }
            }

            let view_count = item
                .statistics
                .and_then(|s| s.view_count)
                .and_then(|v| v.parse::<i64>().ok());

            records.push(VideoRecord {
                video_id: item.id,
                title,
                thumbnail_url,
                view_count,
                published_at,
                duration_seconds,
            });
        }

        tracing::debug!(
            channel_id,
            count = records.len(),
            "listed recent long-form videos"
        );
        Ok(records)
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(endpoint)
            .expect("endpoint joins onto a valid base URL");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        url
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, YoutubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
