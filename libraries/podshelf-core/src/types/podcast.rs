//! Podcast, episode and subscription types

use super::ids::{EpisodeId, PodcastId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Podcast feed known to the system (shared by all users)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: PodcastId,
    pub feed_url: String,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Episode of a podcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub podcast_id: PodcastId,
    /// Feed-provided identifier, unique within the podcast
    pub guid: String,
    pub title: String,
    pub description: Option<String>,
    pub audio_url: String,
    pub duration_seconds: Option<f64>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Parsed podcast metadata handed over by feed ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPodcast {
    pub feed_url: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Parsed episode record handed over by feed ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEpisode {
    pub guid: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub audio_url: String,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// A parsed feed: the podcast plus its episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportFeed {
    pub podcast: NewPodcast,
    #[serde(default)]
    pub episodes: Vec<NewEpisode>,
}

/// Outcome of importing a parsed feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub podcast: Podcast,
    /// Episodes newly stored
    pub inserted: usize,
    /// Episodes skipped because their guid was already known
    pub skipped: usize,
}

/// A user's subscription to a podcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub podcast: Podcast,
    pub subscribed_at: DateTime<Utc>,
}
