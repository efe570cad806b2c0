//! Typed projections of upstream payloads.
//!
//! The gateway passes most backend data through untouched; these structs
//! bind only the fields the aggregation orchestrator reads, and keep every
//! other field in a flattened map so composite responses do not drop data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Odds-service payload wrapping event records (`/event/{id}` and
/// `/markets/{sportId}` both use the `events` wrapper).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// A single event/market record from the odds service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub home: String,
    pub away: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_id: Option<i64>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl EventRecord {
    /// Search query for prematch-odds videos about this event.
    pub fn odds_query(&self) -> String {
        format!("{} vs {} betting odds", self.home, self.away)
    }

    /// Search query for videos about this matchup.
    pub fn matchup_query(&self) -> String {
        format!("{} vs {}", self.home, self.away)
    }
}

/// A sport/category record from the odds service (`/sports` returns a list
/// of these).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl SportRecord {
    /// Search query for betting channels covering this sport.
    pub fn channels_query(&self) -> String {
        format!("{} betting", self.name)
    }
}

/// Video-service search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub contents: Vec<SearchHit>,
}

/// One search result. Entries that are not videos (playlists, channels)
/// deserialize with `video: None` and are skipped by the projections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub video: Option<VideoInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

impl SearchResults {
    /// Project hits into `{title, videoId}` pairs, skipping non-video hits
    /// and hits missing either field.
    pub fn video_refs(&self) -> Vec<VideoRef> {
        self.contents
            .iter()
            .filter_map(|hit| hit.video.as_ref())
            .filter_map(|video| {
                Some(VideoRef {
                    title: video.title.clone()?,
                    video_id: video.video_id.clone()?,
                })
            })
            .collect()
    }

    /// Channel id of the best (first) video hit, if any.
    pub fn first_channel_id(&self) -> Option<&str> {
        self.contents
            .iter()
            .filter_map(|hit| hit.video.as_ref())
            .find_map(|video| video.channel_id.as_deref())
    }
}

/// Reduced video shape emitted by the aggregation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    pub title: String,
    pub video_id: String,
}

/// Composite record: one market/event plus the videos found for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketVideos {
    pub event: EventRecord,
    pub videos: Vec<VideoRef>,
}

/// Composite record: one sport plus the best-match channel found for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMatch {
    pub sport: String,
    pub channel: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_search() -> SearchResults {
        serde_json::from_value(json!({
            "contents": [
                {"video": {"title": "Odds preview", "videoId": "v1", "channelId": "c1"}},
                {"playlist": {"playlistId": "p1"}},
                {"video": {"videoId": "v2"}},
                {"video": {"title": "Full match", "videoId": "v3"}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_query_derivation() {
        let event: EventRecord = serde_json::from_value(json!({
            "home": "X", "away": "Y", "league_id": 1980, "event_id": 42
        }))
        .unwrap();
        assert_eq!(event.odds_query(), "X vs Y betting odds");
        assert_eq!(event.matchup_query(), "X vs Y");

        let sport: SportRecord = serde_json::from_value(json!({"id": 1, "name": "Soccer"})).unwrap();
        assert_eq!(sport.channels_query(), "Soccer betting");
    }

    #[test]
    fn test_video_refs_skip_incomplete_hits() {
        let refs = sample_search().video_refs();
        assert_eq!(
            refs,
            vec![
                VideoRef {
                    title: "Odds preview".into(),
                    video_id: "v1".into()
                },
                VideoRef {
                    title: "Full match".into(),
                    video_id: "v3".into()
                },
            ]
        );
    }

    #[test]
    fn test_first_channel_id() {
        assert_eq!(sample_search().first_channel_id(), Some("c1"));

        let empty: SearchResults = serde_json::from_value(json!({"contents": []})).unwrap();
        assert_eq!(empty.first_channel_id(), None);
    }

    #[test]
    fn test_event_record_keeps_unknown_fields() {
        let raw = json!({
            "home": "X", "away": "Y",
            "event_id": 42, "starts": "2026-08-06T18:00:00Z"
        });
        let event: EventRecord = serde_json::from_value(raw).unwrap();
        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["event_id"], 42);
        assert_eq!(back["starts"], "2026-08-06T18:00:00Z");
        // Absent optional fields stay absent on the way back out.
        assert!(back.get("league_id").is_none());
    }

    #[test]
    fn test_missing_contents_defaults_empty() {
        let results: SearchResults = serde_json::from_value(json!({})).unwrap();
        assert!(results.contents.is_empty());
        assert!(results.video_refs().is_empty());
    }
}
