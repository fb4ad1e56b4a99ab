//! Configuration module for the pricepulse application.

mod chart;
mod debug;
mod feed;

// Can't be private because we don't re-export it
pub mod plot;

// Re-export commonly used items
pub use chart::{AnimationConfig, ChartConfig, ChartMargins, MarketDefaults, CHART};
pub use debug::DF;
pub use feed::{ClientDefaults, FeedConfig, WsConfig, FEED};
