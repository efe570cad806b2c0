//! Positional round-robin selection over configured backend instances.
//!
//! No health awareness, weighting, or backoff: a dead instance stays in
//! rotation until the process restarts. This is an explicit design
//! limitation of the gateway, not an oversight.

use std::sync::atomic::{AtomicUsize, Ordering};

use oddsgate_core::{GatewayError, Service};

use crate::config::ServicesConfig;

/// One rotation: an ordered, non-empty instance list plus its cursor.
#[derive(Debug)]
struct Rotation {
    urls: Vec<String>,
    cursor: AtomicUsize,
}

impl Rotation {
    fn new(service: Service, urls: &[String]) -> Result<Self, GatewayError> {
        if urls.is_empty() {
            return Err(GatewayError::configuration(format!(
                "no instances configured for {service} service"
            )));
        }
        // Base URLs are joined with absolute paths; a trailing slash would
        // produce double slashes in upstream URLs.
        let urls = urls
            .iter()
            .map(|u| u.trim_end_matches('/').to_string())
            .collect();
        Ok(Self {
            urls,
            cursor: AtomicUsize::new(0),
        })
    }

    fn next(&self) -> &str {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.urls.len();
        &self.urls[index]
    }
}

/// Round-robin load balancer holding one independent rotation per service.
///
/// Selection is synchronous and lock-free; the atomic cursor keeps
/// concurrent selections from ever losing an increment or handing two
/// callers the same position.
#[derive(Debug)]
pub struct LoadBalancer {
    odds: Rotation,
    video: Rotation,
}

impl LoadBalancer {
    /// Build the balancer from validated configuration. Empty instance
    /// lists are a configuration error and abort startup.
    pub fn from_config(services: &ServicesConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            odds: Rotation::new(Service::Odds, services.instances(Service::Odds))?,
            video: Rotation::new(Service::Video, services.instances(Service::Video))?,
        })
    }

    /// Select the next instance base URL for a service, advancing that
    /// service's cursor. Cursors for different services are independent.
    pub fn select(&self, service: Service) -> &str {
        match service {
            Service::Odds => self.odds.next(),
            Service::Video => self.video.next(),
        }
    }
}
