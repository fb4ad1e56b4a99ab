//! One chart session: the feed, the rolling window, the derived market
//! stats, the trade tape and the animation scheduler, wired together and
//! polled from the frame loop.
//!
//! This is the only writer of all of that state. Background threads talk to
//! it exclusively through the channels inside `FeedSource`, so no locking
//! happens anywhere on the frame path.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{CHART, DF};
use crate::data::{FeedOptions, FeedSource, FeedStatus};
use crate::models::{HistoryBuffer, MarketSnapshot, Tick, TradeRecord, TradeTape};

use super::AnimationScheduler;

pub struct ChartSession {
    feed: FeedSource,
    history: HistoryBuffer,
    market: MarketSnapshot,
    trades: TradeTape,
    scheduler: AnimationScheduler,
    rng: StdRng,
    start_price: Option<f64>,
    on_price_update: Option<Box<dyn FnMut(&Tick)>>,
}

impl ChartSession {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::with_rng(symbol, StdRng::from_entropy())
    }

    pub(crate) fn with_rng(symbol: impl Into<String>, rng: StdRng) -> Self {
        Self {
            feed: FeedSource::new(symbol),
            history: HistoryBuffer::new(CHART.max_points),
            market: MarketSnapshot::default(),
            trades: TradeTape::new(),
            scheduler: AnimationScheduler::new(CHART.max_points),
            rng,
            start_price: None,
            on_price_update: None,
        }
    }

    /// Start the feed. Any tick produced synchronously (offline seeding) is
    /// accepted immediately.
    pub fn activate(&mut self, now_ms: i64, options: FeedOptions) {
        let ticks = self.feed.activate(now_ms, options);
        for tick in ticks {
            self.accept(tick, now_ms);
        }
    }

    /// Drain the feed and fold every new tick into the session. Called once
    /// per frame, before drawing.
    pub fn poll(&mut self, now_ms: i64) {
        let ticks = self.feed.poll(now_ms, &mut self.rng);
        for tick in ticks {
            self.accept(tick, now_ms);
        }
    }

    fn accept(&mut self, tick: Tick, now_ms: i64) {
        self.history.append(tick);

        if self.start_price.is_none() {
            self.start_price = Some(tick.price);
        }

        if let Some(next) = self.market.updated(tick.price, &mut self.rng) {
            self.market = next;
        }

        if self.rng.gen_bool(CHART.trade_probability) {
            let trade = TradeRecord::fabricate(tick.time, tick.price, &mut self.rng);
            if DF.log_trades {
                log::info!("TRADE: {:?} {} @ {:.2}", trade.side, trade.amount, trade.price);
            }
            self.trades.add(trade);
        }

        self.scheduler.enqueue(tick, now_ms);

        if let Some(cb) = &mut self.on_price_update {
            cb(&tick);
        }
    }

    /// Drive the scroll animation; returns the in-flight cycle's progress.
    pub fn advance_animation(&mut self, now_ms: i64) -> f32 {
        self.scheduler.advance(now_ms)
    }

    /// Change since session start, in percent. Zero until seeded.
    pub fn percent_change(&self) -> f64 {
        match (self.start_price, self.history.latest()) {
            (Some(start), Some(latest)) if start != 0.0 => {
                (latest.price - start) / start * 100.0
            }
            _ => 0.0,
        }
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.history.latest().map(|t| t.price)
    }

    pub fn symbol(&self) -> &str {
        self.feed.symbol()
    }

    pub fn feed_status(&self) -> &FeedStatus {
        self.feed.status()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn market(&self) -> &MarketSnapshot {
        &self.market
    }

    pub fn trades(&self) -> &TradeTape {
        &self.trades
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn set_on_price_update(&mut self, cb: Box<dyn FnMut(&Tick)>) {
        self.on_price_update = Some(cb);
    }

    pub fn teardown(&mut self) {
        self.feed.teardown();
        self.scheduler.teardown();
        self.on_price_update = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FEED;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn offline() -> FeedOptions {
        FeedOptions {
            live: false,
            offline: true,
        }
    }

    fn session() -> ChartSession {
        ChartSession::with_rng("btcusdt", StdRng::seed_from_u64(7))
    }

    #[test]
    fn activation_seeds_history_and_scheduler() {
        let mut s = session();
        s.activate(0, offline());

        assert_eq!(s.history().len(), 1);
        assert_eq!(s.latest_price(), Some(FEED.fallback_price));
        assert!(s.scheduler().is_initialized());
        assert_eq!(s.scheduler().series().len(), CHART.max_points);
        assert_eq!(s.percent_change(), 0.0);
    }

    #[test]
    fn poll_folds_every_tick_into_history_in_order() {
        let mut s = session();
        s.activate(0, offline());
        s.poll(5 * FEED.tick_interval_ms);

        assert_eq!(s.history().len(), 6); // seed + 5 synthetic
        let times: Vec<i64> = s.history().iter().map(|t| t.time).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn callback_fires_once_per_accepted_tick() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut s = session();
        s.set_on_price_update(Box::new(move |t| sink.borrow_mut().push(*t)));
        s.activate(0, offline());
        s.poll(3 * FEED.tick_interval_ms);

        let seen = seen.borrow();
        assert_eq!(seen.len(), s.history().len());
        assert_eq!(seen.last().copied(), s.history().latest().copied());
    }

    #[test]
    fn percent_change_tracks_the_seed_price() {
        let mut s = session();
        s.activate(0, offline());
        s.poll(10 * FEED.tick_interval_ms);

        let latest = s.latest_price().unwrap();
        let expect = (latest - FEED.fallback_price) / FEED.fallback_price * 100.0;
        assert!((s.percent_change() - expect).abs() < 1e-12);
    }

    #[test]
    fn teardown_stops_growth() {
        let mut s = session();
        s.activate(0, offline());
        s.teardown();
        let before = s.history().len();
        s.poll(20 * FEED.tick_interval_ms);
        assert_eq!(s.history().len(), before);
    }
}
