//! Clients for the external video-platform APIs: channel/video metadata and
//! the transcript actor.

mod client;
mod duration;
mod error;
mod transcript;
mod types;

pub use client::YoutubeClient;
pub use duration::parse_iso8601_duration;
pub use error::YoutubeError;
pub use transcript::TranscriptClient;
pub use types::{ChannelInfo, VideoRecord};
