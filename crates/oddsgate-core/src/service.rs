use serde::{Deserialize, Serialize};

/// Identity of a fronted backend service.
///
/// The gateway fronts exactly two upstreams; modelling them as an enum makes
/// a lookup of an unknown service unrepresentable, so misrouting is a
/// compile error rather than a runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    /// Sports/odds statistics service.
    Odds,
    /// Video search service.
    Video,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Odds => "odds",
            Self::Video => "video",
        }
    }

    /// All fronted services, in registry order.
    pub const ALL: [Service; 2] = [Service::Odds, Service::Video];
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_as_str() {
        for service in Service::ALL {
            assert_eq!(service.to_string(), service.as_str());
        }
    }

    #[test]
    fn test_serde_kebab_case() {
        assert_eq!(serde_json::to_string(&Service::Odds).unwrap(), "\"odds\"");
        assert_eq!(serde_json::to_string(&Service::Video).unwrap(), "\"video\"");
    }
}
