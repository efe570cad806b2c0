use serde::{Deserialize, Serialize};

/// Response envelope for cached endpoints: the payload plus whether it was
/// served from the cache or fetched fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cached<T> {
    pub from_cache: bool,
    pub data: T,
}

impl<T> Cached<T> {
    /// Wrap a value that was served from the cache.
    pub fn hit(data: T) -> Self {
        Self {
            from_cache: true,
            data,
        }
    }

    /// Wrap a value that was fetched from the backend.
    pub fn fetched(data: T) -> Self {
        Self {
            from_cache: false,
            data,
        }
    }

    /// Map the payload, preserving the cache flag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Cached<U> {
        Cached {
            from_cache: self.from_cache,
            data: f(self.data),
        }
    }
}
