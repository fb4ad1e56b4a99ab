use std::collections::VecDeque;

use rand::Rng;
use uuid::Uuid;

use crate::config::{CHART, DF};
use crate::utils::epoch_ms_to_clock_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "Buy"),
            TradeSide::Sell => write!(f, "Sell"),
        }
    }
}

/// One fabricated ledger entry. Synthetic by design: trades are locally
/// invented from the current price, never executed anywhere.
#[derive(Debug, Clone)]
pub struct TradeRecord {
    pub id: String,
    /// Wall-clock display string (HH:MM:SS), not an epoch.
    pub time: String,
    pub side: TradeSide,
    pub price: f64,
    pub amount: f64,
    pub total: f64,
}

impl TradeRecord {
    /// Fabricate a trade around `price`: random side, random size, and a
    /// small random price offset so the tape doesn't read as one number.
    pub fn fabricate(time_ms: i64, price: f64, rng: &mut impl Rng) -> Self {
        let side = if rng.gen_bool(0.5) {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        };
        let (lo, hi) = CHART.trade_amount_range;
        let amount = rng.gen_range(lo..hi);
        let offset: f64 = rng.gen_range(-0.5..0.5);
        let fill_price = price * (1.0 + offset * 0.0004);

        Self {
            id: Uuid::new_v4().to_string(),
            time: epoch_ms_to_clock_string(time_ms),
            side,
            price: fill_price,
            amount,
            total: fill_price * amount,
        }
    }
}

/// Capped mock trade ledger, newest entry at the front.
#[derive(Debug, Clone, Default)]
pub struct TradeTape {
    trades: VecDeque<TradeRecord>,
}

impl TradeTape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push to the front; evict the oldest (tail) entry past capacity.
    pub fn add(&mut self, trade: TradeRecord) {
        if DF.log_trades {
            log::info!(
                "TAPE: {} {:.6} @ {:.2} (total {:.2})",
                trade.side,
                trade.amount,
                trade.price,
                trade.total
            );
        }

        self.trades.push_front(trade);
        if self.trades.len() > CHART.trade_cap {
            self.trades.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &TradeRecord> {
        self.trades.iter()
    }
}
