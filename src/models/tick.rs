use serde::{Deserialize, Serialize};

/// One (time, price) sample from the feed. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Milliseconds since epoch.
    pub time: i64,
    pub price: f64,
}

impl Tick {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }
}
