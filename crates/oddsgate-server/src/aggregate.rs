//! Aggregation orchestrator: composes fetches across both services into
//! composite results.
//!
//! All three shapes share the same rules: output order mirrors the primary
//! record order, concurrency is used only for independent secondary calls,
//! and a failed secondary call fails the whole aggregate (no partial
//! results). The composite result is cached as a whole by the handler;
//! secondary calls are not cached individually.

use std::future::Future;

use futures_util::future::try_join_all;
use oddsgate_core::{
    ChannelMatch, EventList, EventRecord, GatewayError, MarketVideos, SearchResults, Service,
    SportRecord, VideoRef,
};
use serde_json::Value;

use crate::fetch;
use crate::server::AppState;

/// Upper bound on videos attached to each market record.
const VIDEOS_PER_MARKET: usize = 3;

/// Run `lookup` for every item concurrently, collecting results in input
/// order regardless of completion order. Fails fast: the first error fails
/// the group, and the remaining futures are dropped.
pub async fn fan_out<T, R, F, Fut>(items: Vec<T>, lookup: F) -> Result<Vec<R>, GatewayError>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R, GatewayError>>,
{
    try_join_all(items.into_iter().map(lookup)).await
}

/// Single secondary lookup: event record → derived query → one video
/// search, projected to `{title, videoId}` pairs.
///
/// The event fetch goes through the same cache-aside operation the plain
/// `/event/{id}` endpoint uses, so a warm event cache is reused here.
pub async fn prematch_odds_videos(
    state: &AppState,
    event_id: &str,
) -> Result<Vec<VideoRef>, GatewayError> {
    let payload = fetch::event(state, event_id).await?.data;
    let event = first_event(payload, event_id)?;

    let results = search_videos(state, &event.odds_query()).await?;
    Ok(results.video_refs())
}

/// Fan-out over a primary list: every market record of the requested league
/// gets up to three videos found for its matchup, zipped back in market
/// order.
pub async fn markets_with_videos(
    state: &AppState,
    sport_id: i64,
    league_id: i64,
) -> Result<Vec<MarketVideos>, GatewayError> {
    let payload = fetch::markets(state, sport_id).await?.data;
    let list: EventList = serde_json::from_value(payload)
        .map_err(|e| GatewayError::malformed(Service::Odds, e.to_string()))?;

    let events: Vec<EventRecord> = list
        .events
        .into_iter()
        .filter(|event| event.league_id == Some(league_id))
        .collect();

    fan_out(events, |event| async move {
        let results = search_videos(state, &event.matchup_query()).await?;
        let videos = results
            .video_refs()
            .into_iter()
            .take(VIDEOS_PER_MARKET)
            .collect();
        Ok(MarketVideos { event, videos })
    })
    .await
}

/// Two-level secondary lookup: for every sport, search for a betting
/// channel and, when the search has hits, fetch the best match's channel
/// details. Sports whose search comes back empty keep their slot as `None`
/// rather than failing the aggregate.
pub async fn betting_channels(
    state: &AppState,
) -> Result<Vec<Option<ChannelMatch>>, GatewayError> {
    let payload = fetch::sports(state).await?.data;
    let sports: Vec<SportRecord> = serde_json::from_value(payload)
        .map_err(|e| GatewayError::malformed(Service::Odds, e.to_string()))?;

    fan_out(sports, |sport| async move {
        let results = search_videos(state, &sport.channels_query()).await?;
        let Some(channel_id) = results.first_channel_id().map(str::to_string) else {
            return Ok(None);
        };
        let channel = channel_details(state, &channel_id).await?;
        Ok(Some(ChannelMatch {
            sport: sport.name,
            channel,
        }))
    })
    .await
}

fn first_event(payload: Value, event_id: &str) -> Result<EventRecord, GatewayError> {
    let list: EventList = serde_json::from_value(payload)
        .map_err(|e| GatewayError::malformed(Service::Odds, e.to_string()))?;
    list.events.into_iter().next().ok_or_else(|| {
        GatewayError::malformed(Service::Odds, format!("event {event_id} has no records"))
    })
}

async fn search_videos(state: &AppState, query: &str) -> Result<SearchResults, GatewayError> {
    let base = state.balancer.select(Service::Video);
    let value = state
        .client
        .get_json(Service::Video, base, "/search", &[("query", query)])
        .await?;
    serde_json::from_value(value).map_err(|e| GatewayError::malformed(Service::Video, e.to_string()))
}

async fn channel_details(state: &AppState, id: &str) -> Result<Value, GatewayError> {
    let base = state.balancer.select(Service::Video);
    state
        .client
        .get_json(Service::Video, base, "/channel", &[("id", id)])
        .await
}
