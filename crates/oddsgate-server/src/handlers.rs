//! Route handlers, one per exposed endpoint.
//!
//! Each handler validates required parameters, delegates to the fetch or
//! aggregation layer, and wraps success as `{fromCache, data}`. Failures
//! map to a 500 with the endpoint's fixed message; the underlying cause is
//! logged with its full granularity (status, timeout, unreachable).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use oddsgate_core::{Cached, GatewayError, cache_key};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{aggregate, cache::read_through, fetch, server::AppState};

/// A handler failure: the internal cause plus the stable public message.
pub struct EndpointError {
    cause: GatewayError,
    message: &'static str,
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        if let GatewayError::MissingParameter(name) = &self.cause {
            return (
                StatusCode::BAD_REQUEST,
                format!("Missing required parameter: {name}"),
            )
                .into_response();
        }
        tracing::error!(
            error = %self.cause,
            not_found = self.cause.is_not_found(),
            "{}", self.message
        );
        (StatusCode::INTERNAL_SERVER_ERROR, self.message).into_response()
    }
}

fn fail(message: &'static str) -> impl Fn(GatewayError) -> EndpointError {
    move |cause| EndpointError { cause, message }
}

type Enveloped<T = Value> = Result<Json<Cached<T>>, EndpointError>;

// ---- Gateway status ----

/// Bypasses caching and load balancing entirely.
pub async fn status() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "OK"})))
}

// ---- Odds service pass-through ----

pub async fn sports(State(state): State<AppState>) -> Enveloped {
    let result = fetch::sports(&state)
        .await
        .map_err(fail("Error fetching sports data"))?;
    Ok(Json(result))
}

pub async fn markets(State(state): State<AppState>, Path(sport_id): Path<i64>) -> Enveloped {
    let result = fetch::markets(&state, sport_id)
        .await
        .map_err(fail("Error fetching market data"))?;
    Ok(Json(result))
}

pub async fn leagues(State(state): State<AppState>, Path(sport_id): Path<i64>) -> Enveloped {
    let result = fetch::leagues(&state, sport_id)
        .await
        .map_err(fail("Error fetching league data"))?;
    Ok(Json(result))
}

pub async fn event(State(state): State<AppState>, Path(event_id): Path<String>) -> Enveloped {
    let result = fetch::event(&state, &event_id)
        .await
        .map_err(fail("Error fetching event details"))?;
    Ok(Json(result))
}

// ---- Video service pass-through ----

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub next: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Enveloped {
    let on_error = fail("Error performing video search");
    let query = require(params.query.as_deref(), "query").map_err(&on_error)?;
    let result = fetch::search(&state, query, params.next.as_deref())
        .await
        .map_err(&on_error)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct VideoParams {
    pub id: Option<String>,
    pub next: Option<String>,
}

pub async fn video(State(state): State<AppState>, Query(params): Query<VideoParams>) -> Enveloped {
    let on_error = fail("Error fetching video details");
    let id = require(params.id.as_deref(), "id").map_err(&on_error)?;
    let result = fetch::video(&state, id).await.map_err(&on_error)?;
    Ok(Json(result))
}

pub async fn video_related(
    State(state): State<AppState>,
    Query(params): Query<VideoParams>,
) -> Enveloped {
    let on_error = fail("Error fetching related video details");
    let id = require(params.id.as_deref(), "id").map_err(&on_error)?;
    let result = fetch::video_related(&state, id, params.next.as_deref())
        .await
        .map_err(&on_error)?;
    Ok(Json(result))
}

pub async fn video_comments(
    State(state): State<AppState>,
    Query(params): Query<VideoParams>,
) -> Enveloped {
    let on_error = fail("Error fetching video comments");
    let id = require(params.id.as_deref(), "id").map_err(&on_error)?;
    let result = fetch::video_comments(&state, id, params.next.as_deref())
        .await
        .map_err(&on_error)?;
    Ok(Json(result))
}

pub async fn channel(
    State(state): State<AppState>,
    Query(params): Query<VideoParams>,
) -> Enveloped {
    let on_error = fail("Error fetching channel details");
    let id = require(params.id.as_deref(), "id").map_err(&on_error)?;
    let result = fetch::channel(&state, id).await.map_err(&on_error)?;
    Ok(Json(result))
}

// ---- Aggregation endpoints ----
//
// The whole composite result goes through the cache-aside layer: either the
// full aggregate is a hit or the entire aggregate is recomputed.

pub async fn search_prematch_odds(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Enveloped<Vec<oddsgate_core::VideoRef>> {
    let key = cache_key::prematch_odds(&event_id);
    let (state, event_id) = (&state, &event_id);
    let result = read_through(&state.cache, &key, state.cache_ttl, || async move {
        aggregate::prematch_odds_videos(state, event_id).await
    })
    .await
    .map_err(fail("Error aggregating prematch odds videos"))?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct MarketsWithVideosParams {
    #[serde(rename = "sportId")]
    pub sport_id: Option<i64>,
}

pub async fn markets_with_videos(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
    Query(params): Query<MarketsWithVideosParams>,
) -> Enveloped<Vec<oddsgate_core::MarketVideos>> {
    let on_error = fail("Error aggregating market videos");
    let sport_id = params
        .sport_id
        .ok_or(GatewayError::MissingParameter("sportId"))
        .map_err(&on_error)?;

    let key = cache_key::markets_with_videos(sport_id, league_id);
    let state = &state;
    let result = read_through(&state.cache, &key, state.cache_ttl, || async move {
        aggregate::markets_with_videos(state, sport_id, league_id).await
    })
    .await
    .map_err(&on_error)?;
    Ok(Json(result))
}

pub async fn betting_channels(
    State(state): State<AppState>,
) -> Enveloped<Vec<Option<oddsgate_core::ChannelMatch>>> {
    let key = cache_key::betting_channels();
    let state = &state;
    let result = read_through(&state.cache, &key, state.cache_ttl, || async move {
        aggregate::betting_channels(state).await
    })
    .await
    .map_err(fail("Error aggregating betting channels"))?;
    Ok(Json(result))
}

/// A required parameter counts as absent when missing or empty.
fn require<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, GatewayError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(GatewayError::MissingParameter(name))
}
