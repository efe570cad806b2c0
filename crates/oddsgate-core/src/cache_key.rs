//! Cache-key derivation.
//!
//! Every key is namespaced by an endpoint prefix and joins parameter values
//! with `:`. Optional parameters are appended only when present, so the same
//! logical request always derives the same key and distinct parameter sets
//! never collide within an endpoint's namespace.

/// Join a prefix with parameter values.
fn keyed<const N: usize>(prefix: &str, params: [&str; N]) -> String {
    let mut key = String::from(prefix);
    for param in params {
        key.push(':');
        key.push_str(param);
    }
    key
}

pub fn sports() -> String {
    "sports".to_string()
}

pub fn markets(sport_id: i64) -> String {
    keyed("markets", [&sport_id.to_string()])
}

pub fn leagues(sport_id: i64) -> String {
    keyed("leagues", [&sport_id.to_string()])
}

pub fn event(event_id: &str) -> String {
    keyed("event", [event_id])
}

pub fn search(query: &str, next: Option<&str>) -> String {
    match next {
        Some(next) => keyed("search", [query, next]),
        None => keyed("search", [query]),
    }
}

pub fn video(id: &str) -> String {
    keyed("video", [id])
}

pub fn video_related(id: &str, next: Option<&str>) -> String {
    match next {
        Some(next) => keyed("videoRelated", [id, next]),
        None => keyed("videoRelated", [id]),
    }
}

pub fn video_comments(id: &str, next: Option<&str>) -> String {
    match next {
        Some(next) => keyed("videoComments", [id, next]),
        None => keyed("videoComments", [id]),
    }
}

pub fn channel(id: &str) -> String {
    keyed("channel", [id])
}

pub fn prematch_odds(event_id: &str) -> String {
    keyed("prematchOdds", [event_id])
}

pub fn markets_with_videos(sport_id: i64, league_id: i64) -> String {
    keyed(
        "marketsWithVideos",
        [&sport_id.to_string(), &league_id.to_string()],
    )
}

pub fn betting_channels() -> String {
    "bettingChannels".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_stable() {
        assert_eq!(event("42"), "event:42");
        assert_eq!(event("42"), event("42"));
        assert_eq!(markets(3), "markets:3");
        assert_eq!(markets_with_videos(3, 1980), "marketsWithVideos:3:1980");
    }

    #[test]
    fn test_optional_params_extend_the_key() {
        assert_eq!(search("liverpool odds", None), "search:liverpool odds");
        assert_eq!(
            search("liverpool odds", Some("CBQ")),
            "search:liverpool odds:CBQ"
        );
        assert_eq!(video_related("abc", None), "videoRelated:abc");
        assert_eq!(video_comments("abc", Some("p2")), "videoComments:abc:p2");
    }

    #[test]
    fn test_endpoint_prefixes_never_collide() {
        // Same raw parameter value across endpoints must derive distinct keys.
        let keys = [
            markets(7),
            leagues(7),
            event("7"),
            search("7", None),
            video("7"),
            video_related("7", None),
            video_comments("7", None),
            channel("7"),
            prematch_odds("7"),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_parameterless_keys() {
        assert_eq!(sports(), "sports");
        assert_eq!(betting_channels(), "bettingChannels");
    }
}
