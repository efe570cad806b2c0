use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, middleware, routing::get};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::{
    balancer::LoadBalancer,
    cache::{self, CacheBackend},
    config::AppConfig,
    handlers,
    middleware as app_middleware,
    upstream::BackendClient,
};

/// Shared dependencies handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub balancer: Arc<LoadBalancer>,
    pub client: BackendClient,
    pub cache: CacheBackend,
    pub cache_ttl: Duration,
}

impl AppState {
    pub async fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let balancer = Arc::new(LoadBalancer::from_config(&cfg.services)?);
        let client = BackendClient::new(cfg.upstream_timeout())?;
        let cache = cache::create_cache_backend(&cfg.redis).await;
        Ok(Self {
            balancer,
            client,
            cache,
            cache_ttl: cfg.cache_ttl(),
        })
    }
}

pub fn build_app(cfg: &AppConfig, state: AppState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Gateway status; bypasses caching and load balancing
        .route("/status", get(handlers::status))
        // Odds service pass-through
        .route("/sports", get(handlers::sports))
        .route("/markets/{sport_id}", get(handlers::markets))
        .route("/leagues/{sport_id}", get(handlers::leagues))
        .route("/event/{event_id}", get(handlers::event))
        // Video service pass-through
        .route("/search", get(handlers::search))
        .route("/video", get(handlers::video))
        .route("/video/related", get(handlers::video_related))
        .route("/video/comments", get(handlers::video_comments))
        .route("/channel", get(handlers::channel))
        // Aggregation endpoints
        .route(
            "/searchPrematchOdds/{event_id}",
            get(handlers::search_prematch_odds),
        )
        .route(
            "/marketsWithVideos/{league_id}",
            get(handlers::markets_with_videos),
        )
        .route("/bettingChannels", get(handlers::betting_channels))
        .with_state(state)
        // Middleware stack, inner to outer: cors/compression -> timeout ->
        // trace -> request id. The timeout drops the handler future, which
        // cancels any in-flight backend calls; trace sits outside it so
        // timed-out requests still get an access log line.
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(cfg.request_timeout()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct OddsgateServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<OddsgateServer> {
        let state = AppState::from_config(&self.config).await?;
        let app = build_app(&self.config, state);

        Ok(OddsgateServer {
            addr: self.config.addr(),
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OddsgateServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
