//! Chart pipeline constants (Immutable Blueprints).
//!
//! Every "magic number" the pipeline depends on lives here as a named field:
//! the hysteresis band, the y-scale padding floor, animation pacing. None of
//! these have a derivation beyond what the product observably does, so they
//! are configuration, not code.

pub struct ChartMargins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

pub struct AnimationConfig {
    /// Playback duration of one scroll-and-append cycle with an empty queue.
    pub base_duration_ms: f64,
    /// Backlog speed-up: duration = base / (1 + queue_len * backlog_factor).
    pub backlog_factor: f64,
}

/// Session-start values for the market statistics panel.
pub struct MarketDefaults {
    pub volume_24h: f64,
    pub market_cap: f64,
    pub high_24h: f64,
    pub low_24h: f64,
}

pub struct ChartConfig {
    /// History / visible-window capacity. One knob on purpose: the working
    /// series the scheduler scrolls is the same width as the history window.
    pub max_points: usize,

    /// Minimum relative move past the recorded high/low before the market
    /// snapshot updates at all (suppresses noise-driven churn).
    pub hysteresis_band: f64,
    /// Relative amplitude of the volume/market-cap drift applied on an
    /// eligible market update.
    pub market_drift_amplitude: f64,
    pub market_defaults: MarketDefaults,

    /// Floor for the y-scale safety padding fraction.
    pub min_pad_fraction: f64,

    pub animation: AnimationConfig,
    pub margins: ChartMargins,

    /// Trade tape capacity (newest first, oldest evicted).
    pub trade_cap: usize,
    /// Chance of fabricating a mock trade for an accepted tick.
    pub trade_probability: f64,
    /// Mock trade size range, in base units.
    pub trade_amount_range: (f64, f64),
}

pub const CHART: ChartConfig = ChartConfig {
    max_points: 120,

    hysteresis_band: 0.001, // 0.1%
    market_drift_amplitude: 0.005,
    market_defaults: MarketDefaults {
        volume_24h: 28_500_000_000.0,
        market_cap: 1_020_000_000_000.0,
        high_24h: 52_450.0,
        low_24h: 50_820.0,
    },

    min_pad_fraction: 0.001,

    animation: AnimationConfig {
        base_duration_ms: 800.0,
        backlog_factor: 0.5,
    },
    margins: ChartMargins {
        left: 12.0,
        right: 64.0,
        top: 16.0,
        bottom: 28.0,
    },

    trade_cap: 10,
    trade_probability: 0.35,
    trade_amount_range: (0.001, 0.25),
};
