use rand::Rng;

use crate::config::{CHART, DF};

/// Derived market statistics shown in the stats panel.
///
/// Within a session `high_24h` only ratchets up and `low_24h` only ratchets
/// down. An update is applied at all only when the new price clears the
/// hysteresis band around the recorded extreme; everything else is treated
/// as noise and leaves the snapshot untouched, which doubles as cheap change
/// detection for the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSnapshot {
    pub volume_24h: f64,
    pub market_cap: f64,
    pub high_24h: f64,
    pub low_24h: f64,
}

impl Default for MarketSnapshot {
    fn default() -> Self {
        let d = &CHART.market_defaults;
        Self {
            volume_24h: d.volume_24h,
            market_cap: d.market_cap,
            high_24h: d.high_24h,
            low_24h: d.low_24h,
        }
    }
}

impl MarketSnapshot {
    /// Returns the updated snapshot when `price` clears the hysteresis band,
    /// None when the previous snapshot stands unchanged.
    ///
    /// The volume/cap drift is cosmetic (simulates organic movement, not
    /// derived from the trade tape) and only moves on an eligible update.
    pub fn updated(&self, price: f64, rng: &mut impl Rng) -> Option<MarketSnapshot> {
        let band = CHART.hysteresis_band;
        let above = price > self.high_24h * (1.0 + band);
        let below = price < self.low_24h * (1.0 - band);

        if !above && !below {
            return None;
        }

        let vol_u: f64 = rng.gen_range(-0.5..0.5);
        let cap_u: f64 = rng.gen_range(-0.5..0.5);

        let next = MarketSnapshot {
            volume_24h: self.volume_24h * (1.0 + vol_u * CHART.market_drift_amplitude),
            market_cap: self.market_cap * (1.0 + cap_u * CHART.market_drift_amplitude),
            high_24h: self.high_24h.max(price),
            low_24h: self.low_24h.min(price),
        };

        if DF.log_market_updates {
            log::info!(
                "MARKET: ratchet at {:.2} (high {:.2} -> {:.2}, low {:.2} -> {:.2})",
                price,
                self.high_24h,
                next.high_24h,
                self.low_24h,
                next.low_24h
            );
        }

        Some(next)
    }
}
