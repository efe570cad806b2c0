use oddsgate_core::Service;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    /// Redis configuration
    #[serde(default)]
    pub redis: RedisConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.request_timeout_ms == 0 || self.server.upstream_timeout_ms == 0 {
            return Err("server timeouts must be > 0".into());
        }
        // Service registry validations: instance lists are immutable after
        // startup, so an empty or malformed list must abort here rather than
        // surface per-request.
        for service in Service::ALL {
            let urls = self.services.instances(service);
            if urls.is_empty() {
                return Err(format!("services.{service}.urls must not be empty"));
            }
            for raw in urls {
                url::Url::parse(raw)
                    .map_err(|e| format!("services.{service}.urls entry '{raw}' is invalid: {e}"))?;
            }
        }
        // Cache validation
        if self.cache.ttl_secs == 0 {
            return Err("cache.ttl_secs must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    /// Client-visible request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms as u64)
    }

    /// Per-call timeout for outbound backend requests.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.server.upstream_timeout_ms as u64)
    }

    /// Uniform TTL applied to every cached endpoint.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u32,
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u32,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}
fn default_request_timeout_ms() -> u32 {
    15_000
}
fn default_upstream_timeout_ms() -> u32 {
    10_000
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_ms: default_request_timeout_ms(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Instance base URLs for the two fronted services. Each list is ordered;
/// the load balancer rotates through it positionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_odds_instances")]
    pub odds: ServiceInstances,
    #[serde(default = "default_video_instances")]
    pub video: ServiceInstances,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstances {
    pub urls: Vec<String>,
}

impl ServicesConfig {
    pub fn instances(&self, service: Service) -> &[String] {
        match service {
            Service::Odds => &self.odds.urls,
            Service::Video => &self.video.urls,
        }
    }
}

fn default_odds_instances() -> ServiceInstances {
    ServiceInstances {
        urls: vec!["http://localhost:4000".into()],
    }
}

fn default_video_instances() -> ServiceInstances {
    ServiceInstances {
        urls: vec!["http://localhost:5000".into()],
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            odds: default_odds_instances(),
            video: default_video_instances(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Enable Redis (gracefully degrades without it)
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,

    /// Redis connection URL (e.g., "redis://localhost:6379")
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,

    /// Connection timeout in milliseconds
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_enabled() -> bool {
    false
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_pool_size() -> usize {
    10
}

fn default_redis_timeout_ms() -> u64 {
    5000
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
            pool_size: default_redis_pool_size(),
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL in seconds for cached endpoint results. Uniform across endpoints;
    /// the read-through interface takes a TTL per call so this can be
    /// differentiated later without an interface change.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    120
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Load configuration from a TOML file layered with `ODDSGATE_`-prefixed
/// environment variables (e.g. `ODDSGATE_SERVER__PORT=8080`).
///
/// A missing file is an error only when the path was given explicitly
/// (CLI flag or environment variable); the default path is optional.
pub fn load_config(path: &str, required: bool) -> Result<AppConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name(path).required(required))
        .add_source(config::Environment::with_prefix("ODDSGATE").separator("__"))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.cache.ttl_secs, 120);
        assert_eq!(cfg.server.port, 3000);
        assert!(!cfg.redis.enabled);
    }

    #[test]
    fn test_empty_instance_list_rejected() {
        let mut cfg = AppConfig::default();
        cfg.services.odds.urls.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("services.odds.urls"));
    }

    #[test]
    fn test_malformed_instance_url_rejected() {
        let mut cfg = AppConfig::default();
        cfg.services.video.urls = vec!["not a url".into()];
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("services.video.urls"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut cfg = AppConfig::default();
        cfg.cache.ttl_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let raw = r#"
            [server]
            port = 8080

            [services.odds]
            urls = ["http://10.0.0.1:4000", "http://10.0.0.2:4000"]

            [services.video]
            urls = ["http://10.0.0.3:5000"]

            [redis]
            enabled = true
            url = "redis://cache:6379"

            [cache]
            ttl_secs = 60
        "#;
        let cfg: AppConfig = toml::from_str(raw).unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.services.instances(Service::Odds).len(), 2);
        assert_eq!(cfg.services.instances(Service::Video).len(), 1);
        assert!(cfg.redis.enabled);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(60));
    }
}
