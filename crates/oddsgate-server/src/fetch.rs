//! Per-endpoint cache-aside fetch operations.
//!
//! Each operation derives its cache key, and on a miss selects the next
//! backend instance and issues the pass-through GET. Handlers and the
//! aggregation orchestrator both come through here, so a warm cache is
//! shared between the plain endpoint and any composite built on top of it.

use oddsgate_core::{Cached, GatewayError, Service, cache_key};
use serde_json::Value;

use crate::cache::read_through;
use crate::server::AppState;

type Fetch = Result<Cached<Value>, GatewayError>;

async fn passthrough(
    state: &AppState,
    service: Service,
    key: String,
    path: String,
    query: Vec<(&'static str, String)>,
) -> Fetch {
    read_through(&state.cache, &key, state.cache_ttl, || async move {
        let base = state.balancer.select(service);
        let query: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        state.client.get_json(service, base, &path, &query).await
    })
    .await
}

pub async fn sports(state: &AppState) -> Fetch {
    passthrough(
        state,
        Service::Odds,
        cache_key::sports(),
        "/sports".to_string(),
        vec![],
    )
    .await
}

pub async fn markets(state: &AppState, sport_id: i64) -> Fetch {
    passthrough(
        state,
        Service::Odds,
        cache_key::markets(sport_id),
        format!("/markets/{sport_id}"),
        vec![],
    )
    .await
}

pub async fn leagues(state: &AppState, sport_id: i64) -> Fetch {
    passthrough(
        state,
        Service::Odds,
        cache_key::leagues(sport_id),
        format!("/leagues/{sport_id}"),
        vec![],
    )
    .await
}

pub async fn event(state: &AppState, event_id: &str) -> Fetch {
    passthrough(
        state,
        Service::Odds,
        cache_key::event(event_id),
        format!("/event/{event_id}"),
        vec![],
    )
    .await
}

pub async fn search(state: &AppState, query: &str, next: Option<&str>) -> Fetch {
    let mut params = vec![("query", query.to_string())];
    if let Some(next) = next {
        params.push(("next", next.to_string()));
    }
    passthrough(
        state,
        Service::Video,
        cache_key::search(query, next),
        "/search".to_string(),
        params,
    )
    .await
}

pub async fn video(state: &AppState, id: &str) -> Fetch {
    passthrough(
        state,
        Service::Video,
        cache_key::video(id),
        "/video".to_string(),
        vec![("id", id.to_string())],
    )
    .await
}

pub async fn video_related(state: &AppState, id: &str, next: Option<&str>) -> Fetch {
    let mut params = vec![("id", id.to_string())];
    if let Some(next) = next {
        params.push(("next", next.to_string()));
    }
    passthrough(
        state,
        Service::Video,
        cache_key::video_related(id, next),
        "/video/related".to_string(),
        params,
    )
    .await
}

pub async fn video_comments(state: &AppState, id: &str, next: Option<&str>) -> Fetch {
    let mut params = vec![("id", id.to_string())];
    if let Some(next) = next {
        params.push(("next", next.to_string()));
    }
    passthrough(
        state,
        Service::Video,
        cache_key::video_comments(id, next),
        "/video/comments".to_string(),
        params,
    )
    .await
}

pub async fn channel(state: &AppState, id: &str) -> Fetch {
    passthrough(
        state,
        Service::Video,
        cache_key::channel(id),
        "/channel".to_string(),
        vec![("id", id.to_string())],
    )
    .await
}
