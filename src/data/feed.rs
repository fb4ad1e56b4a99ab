//! Feed source: seeds a starting price (live quote or fallback), then emits
//! one tick per configured interval from a synthetic random walk. A live
//! trade stream, when enabled, resyncs the walk onto real prices.
//!
//! Everything here is polled from the UI thread; background work hands its
//! results over on channels and never touches feed state directly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

use rand::Rng;

use crate::config::{DF, FEED};
use crate::data::live::spawn_live_stream;
use crate::data::quote::spawn_seed_fetch;
use crate::models::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Uninitialized,
    Seeding,
    Running,
    TornDown,
}

/// What the status strip shows. `connected` is about the feed having a price
/// to work from, not about any socket being up; the fallback path connects
/// too, with the failure surfaced in `error`.
#[derive(Debug, Clone, Default)]
pub struct FeedStatus {
    pub connected: bool,
    pub error: Option<String>,
    /// True when the seed price came from a real quote.
    pub live_seeded: bool,
    /// True when the trade stream is feeding the generator.
    pub streaming: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedOptions {
    /// Attach the live trade stream after seeding.
    pub live: bool,
    /// Skip the quote fetch entirely and seed from the fallback price.
    pub offline: bool,
}

/// Random walk emitting ticks on a fixed cadence. Tick times advance by
/// exactly the interval from the seed time, independent of when poll runs,
/// so a stalled frame yields a burst of correctly-timed ticks rather than
/// a gap.
struct SyntheticGenerator {
    price: f64,
    next_due_ms: i64,
}

impl SyntheticGenerator {
    fn new(seed_time_ms: i64, seed_price: f64) -> Self {
        Self {
            price: seed_price,
            next_due_ms: seed_time_ms + FEED.tick_interval_ms,
        }
    }

    fn emit_due(&mut self, now_ms: i64, rng: &mut impl Rng, out: &mut Vec<Tick>) {
        while self.next_due_ms <= now_ms {
            let drift: f64 = rng.gen_range(-0.5..0.5);
            self.price += drift * self.price * FEED.drift_amplitude;
            out.push(Tick::new(self.next_due_ms, self.price));
            self.next_due_ms += FEED.tick_interval_ms;
        }
    }

    /// Pull the walk onto a live trade so synthetic in-fill continues from
    /// reality instead of drifting its own way.
    fn resync(&mut self, tick: &Tick) {
        self.price = tick.price;
        self.next_due_ms = tick.time + FEED.tick_interval_ms;
    }
}

pub struct FeedSource {
    symbol: String,
    phase: FeedPhase,
    status: FeedStatus,
    options: FeedOptions,
    seed_rx: Option<Receiver<Result<f64, String>>>,
    seed_started_ms: i64,
    live_rx: Option<Receiver<Tick>>,
    shutdown: Arc<AtomicBool>,
    generator: Option<SyntheticGenerator>,
}

impl FeedSource {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            phase: FeedPhase::Uninitialized,
            status: FeedStatus::default(),
            options: FeedOptions::default(),
            seed_rx: None,
            seed_started_ms: 0,
            live_rx: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            generator: None,
        }
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Start the feed. Offline mode seeds synchronously from the fallback
    /// price with no error recorded; otherwise the quote fetch runs in the
    /// background and `poll` completes the handoff.
    pub fn activate(&mut self, now_ms: i64, options: FeedOptions) -> Vec<Tick> {
        if self.phase != FeedPhase::Uninitialized {
            return Vec::new();
        }
        self.options = options;

        if options.offline {
            return self.seed(now_ms, FEED.fallback_price, false, None);
        }

        self.begin_seeding(spawn_seed_fetch(self.symbol.clone()), now_ms);
        Vec::new()
    }

    /// Seam for tests: seeding against a caller-owned channel.
    pub(crate) fn begin_seeding(&mut self, rx: Receiver<Result<f64, String>>, now_ms: i64) {
        self.seed_rx = Some(rx);
        self.seed_started_ms = now_ms;
        self.phase = FeedPhase::Seeding;
    }

    /// Drain everything the feed has produced since the last poll, in time
    /// order. Cheap no-op outside Seeding/Running.
    pub fn poll(&mut self, now_ms: i64, rng: &mut impl Rng) -> Vec<Tick> {
        match self.phase {
            FeedPhase::Seeding => self.poll_seeding(now_ms),
            FeedPhase::Running => self.poll_running(now_ms, rng),
            FeedPhase::Uninitialized | FeedPhase::TornDown => Vec::new(),
        }
    }

    fn poll_seeding(&mut self, now_ms: i64) -> Vec<Tick> {
        let outcome = match &self.seed_rx {
            Some(rx) => rx.try_recv(),
            None => Err(TryRecvError::Disconnected),
        };

        match outcome {
            Ok(Ok(price)) => self.seed(now_ms, price, true, None),
            Ok(Err(e)) => self.seed(now_ms, FEED.fallback_price, false, Some(e)),
            Err(TryRecvError::Disconnected) => self.seed(
                now_ms,
                FEED.fallback_price,
                false,
                Some("seed worker vanished".to_string()),
            ),
            Err(TryRecvError::Empty) => {
                if now_ms - self.seed_started_ms >= FEED.seed_deadline_ms {
                    self.seed(
                        now_ms,
                        FEED.fallback_price,
                        false,
                        Some("seed quote timed out".to_string()),
                    )
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn seed(
        &mut self,
        now_ms: i64,
        price: f64,
        live_seeded: bool,
        error: Option<String>,
    ) -> Vec<Tick> {
        self.seed_rx = None;
        self.generator = Some(SyntheticGenerator::new(now_ms, price));
        self.phase = FeedPhase::Running;
        // Connected either way: the chart runs on the fallback walk too.
        self.status.connected = true;
        self.status.live_seeded = live_seeded;
        self.status.error = error;

        if self.options.live {
            let (tx, rx) = channel();
            spawn_live_stream(self.symbol.clone(), tx, Arc::clone(&self.shutdown));
            self.live_rx = Some(rx);
            self.status.streaming = true;
        }

        if DF.log_feed_events {
            log::info!(
                "FEED: {} running from {:.2} ({})",
                self.symbol,
                price,
                if live_seeded { "quote" } else { "fallback" }
            );
        }

        vec![Tick::new(now_ms, price)]
    }

    fn poll_running(&mut self, now_ms: i64, rng: &mut impl Rng) -> Vec<Tick> {
        let mut out = Vec::new();

        let mut stream_lost = false;
        if let Some(rx) = &self.live_rx {
            loop {
                match rx.try_recv() {
                    Ok(tick) => {
                        if let Some(gen) = &mut self.generator {
                            gen.resync(&tick);
                        }
                        out.push(tick);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        stream_lost = true;
                        break;
                    }
                }
            }
        }
        if stream_lost {
            self.live_rx = None;
            self.status.streaming = false;
        }

        if let Some(gen) = &mut self.generator {
            gen.emit_due(now_ms, rng, &mut out);
        }

        out
    }

    /// Stop producing ticks and release background workers. Further polls
    /// return nothing; reactivation is not supported.
    pub fn teardown(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.seed_rx = None;
        self.live_rx = None;
        self.generator = None;
        self.status.streaming = false;
        self.phase = FeedPhase::TornDown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::mpsc::channel;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn offline_activation_seeds_fallback_without_error() {
        let mut feed = FeedSource::new("btcusdt");
        let ticks = feed.activate(
            1_000,
            FeedOptions {
                live: false,
                offline: true,
            },
        );

        assert_eq!(feed.phase(), FeedPhase::Running);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].price, FEED.fallback_price);
        assert!(feed.status().connected);
        assert!(feed.status().error.is_none());
        assert!(!feed.status().live_seeded);
    }

    #[test]
    fn successful_quote_seeds_at_quoted_price() {
        let mut feed = FeedSource::new("btcusdt");
        let (tx, rx) = channel();
        feed.begin_seeding(rx, 0);
        assert_eq!(feed.phase(), FeedPhase::Seeding);

        // Nothing arrived yet.
        assert!(feed.poll(100, &mut rng()).is_empty());
        assert_eq!(feed.phase(), FeedPhase::Seeding);

        tx.send(Ok(61_234.5)).unwrap();
        let ticks = feed.poll(200, &mut rng());
        assert_eq!(feed.phase(), FeedPhase::Running);
        assert_eq!(ticks, vec![Tick::new(200, 61_234.5)]);
        assert!(feed.status().live_seeded);
        assert!(feed.status().error.is_none());
    }

    #[test]
    fn failed_quote_falls_back_but_still_connects() {
        let mut feed = FeedSource::new("btcusdt");
        let (tx, rx) = channel();
        feed.begin_seeding(rx, 0);

        tx.send(Err("quote fetch failed".to_string())).unwrap();
        let ticks = feed.poll(50, &mut rng());

        assert_eq!(feed.phase(), FeedPhase::Running);
        assert_eq!(ticks[0].price, FEED.fallback_price);
        assert!(feed.status().connected);
        assert_eq!(feed.status().error.as_deref(), Some("quote fetch failed"));
    }

    #[test]
    fn seed_deadline_forces_fallback() {
        let mut feed = FeedSource::new("btcusdt");
        let (_tx, rx) = channel::<Result<f64, String>>();
        feed.begin_seeding(rx, 0);

        assert!(feed.poll(FEED.seed_deadline_ms - 1, &mut rng()).is_empty());
        let ticks = feed.poll(FEED.seed_deadline_ms, &mut rng());
        assert_eq!(feed.phase(), FeedPhase::Running);
        assert_eq!(ticks[0].price, FEED.fallback_price);
        assert!(feed.status().error.is_some());
    }

    #[test]
    fn dropped_seed_worker_reads_as_failure() {
        let mut feed = FeedSource::new("btcusdt");
        let (tx, rx) = channel::<Result<f64, String>>();
        feed.begin_seeding(rx, 0);
        drop(tx);

        let ticks = feed.poll(10, &mut rng());
        assert_eq!(feed.phase(), FeedPhase::Running);
        assert_eq!(ticks[0].price, FEED.fallback_price);
    }

    #[test]
    fn tick_times_advance_by_exactly_the_interval() {
        let mut feed = FeedSource::new("btcusdt");
        let mut rng = rng();
        let seeded = feed.activate(
            0,
            FeedOptions {
                live: false,
                offline: true,
            },
        );
        assert_eq!(seeded[0].time, 0);

        // Poll late and irregularly; times stay on the grid.
        let burst = feed.poll(3 * FEED.tick_interval_ms + 137, &mut rng);
        let times: Vec<i64> = burst.iter().map(|t| t.time).collect();
        assert_eq!(
            times,
            vec![
                FEED.tick_interval_ms,
                2 * FEED.tick_interval_ms,
                3 * FEED.tick_interval_ms
            ]
        );

        // Not due yet.
        assert!(feed.poll(3 * FEED.tick_interval_ms + 900, &mut rng).is_empty());
        let next = feed.poll(4 * FEED.tick_interval_ms, &mut rng);
        assert_eq!(next[0].time, 4 * FEED.tick_interval_ms);
    }

    #[test]
    fn synthetic_drift_stays_within_amplitude() {
        let mut feed = FeedSource::new("btcusdt");
        let mut rng = rng();
        feed.activate(
            0,
            FeedOptions {
                live: false,
                offline: true,
            },
        );

        let mut prev = FEED.fallback_price;
        for tick in feed.poll(200 * FEED.tick_interval_ms, &mut rng) {
            let bound = prev * FEED.drift_amplitude * 0.5;
            assert!((tick.price - prev).abs() <= bound + 1e-9);
            prev = tick.price;
        }
    }

    #[test]
    fn teardown_silences_the_feed() {
        let mut feed = FeedSource::new("btcusdt");
        let mut rng = rng();
        feed.activate(
            0,
            FeedOptions {
                live: false,
                offline: true,
            },
        );
        feed.teardown();

        assert_eq!(feed.phase(), FeedPhase::TornDown);
        assert!(feed.poll(10 * FEED.tick_interval_ms, &mut rng).is_empty());
        // Activate after teardown is a no-op too.
        assert!(feed
            .activate(
                0,
                FeedOptions {
                    live: false,
                    offline: true
                }
            )
            .is_empty());
    }
}
