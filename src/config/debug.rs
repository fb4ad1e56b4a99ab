//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Emit verbose logging for live price stream connections and ticks.
    pub log_feed_events: bool,

    /// Log the outcome of the initial quote seed (success, fallback, timing).
    pub log_seed_outcome: bool,

    /// Log animation scheduler cycles (dequeue, duration, queue depth).
    pub log_animation: bool,

    /// Log market snapshot ratchets (high/low updates that pass hysteresis).
    pub log_market_updates: bool,

    /// Log fabricated trades as they land on the tape.
    pub log_trades: bool,

    /// Warn on slow frames.
    pub log_performance: bool,
}

pub const DF: LogFlags = LogFlags {
    log_seed_outcome: true,

    log_feed_events: false,
    log_animation: false,
    log_market_updates: false,
    log_trades: false,
    log_performance: false,
};
