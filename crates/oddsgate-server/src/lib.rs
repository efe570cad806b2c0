pub mod aggregate;
pub mod balancer;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod upstream;

pub use balancer::LoadBalancer;
pub use cache::{CacheBackend, CachedEntry, create_cache_backend, read_through};
pub use config::{
    AppConfig, CacheConfig, LoggingConfig, RedisConfig, ServerConfig, ServicesConfig, load_config,
};
pub use observability::{apply_logging_level, init_tracing};
pub use server::{AppState, OddsgateServer, ServerBuilder, build_app};
pub use upstream::BackendClient;
