mod feed;
mod live;
mod quote;

pub use feed::{FeedOptions, FeedPhase, FeedSource, FeedStatus};
