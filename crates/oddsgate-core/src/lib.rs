pub mod cache_key;
pub mod envelope;
pub mod error;
pub mod records;
pub mod service;

pub use envelope::Cached;
pub use error::{GatewayError, Result};
pub use records::{
    ChannelMatch, EventList, EventRecord, MarketVideos, SearchResults, SportRecord, VideoRef,
};
pub use service::Service;
