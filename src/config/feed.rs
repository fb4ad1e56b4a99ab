//! Feed source configuration: quote endpoint bounds, websocket settings and
//! the synthetic tick generator parameters.

/// REST client bounds for the one-shot quote seed.
/// The original fetch had no timeout at all; we bound it explicitly.
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

pub struct WsConfig {
    pub combined_base_url: &'static str,
    pub initial_reconnect_delay_sec: u64,
    pub max_reconnect_delay_sec: u64,
}

pub struct FeedConfig {
    pub client: ClientDefaults,
    pub ws: WsConfig,

    /// One synthetic tick per this many milliseconds.
    pub tick_interval_ms: i64,
    /// Relative amplitude of the random walk: price += U(-0.5,0.5) * price * amplitude.
    pub drift_amplitude: f64,
    /// Seed price used when the quote fetch fails.
    pub fallback_price: f64,
    /// Hard deadline on the whole seeding phase. If neither a price nor an
    /// error has arrived by then, we fall back and move on.
    pub seed_deadline_ms: i64,
}

pub const FEED: FeedConfig = FeedConfig {
    client: ClientDefaults {
        timeout_ms: 5000,
        retries: 5,
        backoff_ms: 5000,
    },
    ws: WsConfig {
        combined_base_url: "wss://stream.binance.com:9443/stream?streams=",
        initial_reconnect_delay_sec: 1,
        max_reconnect_delay_sec: 300, // 5 minutes
    },
    tick_interval_ms: 1000,
    drift_amplitude: 0.001,
    fallback_price: 50_000.0,
    // Covers timeout * retries with slack; after this the chart must move anyway.
    seed_deadline_ms: 30_000,
};
