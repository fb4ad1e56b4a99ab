//! Queued, sequential playback of incoming ticks.
//!
//! Every accepted tick becomes one scroll-and-append cycle: dequeue, append
//! to the working series, play a translate transition, then evict the oldest
//! sample. Cycles never overlap and never reorder; a backlog only makes each
//! cycle shorter, so the visual catches up instead of lagging further.
//!
//! All state lives on the owned scheduler instance (one per chart session),
//! never in process-wide globals, so mounting two charts can't cross wires.

use std::collections::VecDeque;

use crate::config::{CHART, DF};
use crate::models::Tick;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Playback {
    Idle,
    Playing { started_ms: i64, duration_ms: f64 },
}

pub struct AnimationScheduler {
    queue: VecDeque<Tick>,
    working: VecDeque<Tick>,
    visible_count: usize,
    playback: Playback,
    initialized: bool,
    /// Cleared on teardown; late transition completions then no-op instead
    /// of mutating a dead surface.
    alive: bool,
}

impl AnimationScheduler {
    pub fn new(visible_count: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            working: VecDeque::with_capacity(visible_count + 1),
            visible_count: visible_count.max(2),
            playback: Playback::Idle,
            initialized: false,
            alive: true,
        }
    }

    /// Accept a tick for playback. Never blocks; during playback the tick
    /// just joins the queue tail.
    ///
    /// The very first tick is the initialization cycle: it fills the working
    /// series with `visible_count` copies of itself so the chart starts flat
    /// instead of empty.
    pub fn enqueue(&mut self, tick: Tick, now_ms: i64) {
        if !self.alive {
            return;
        }

        if !self.initialized {
            self.working.clear();
            for _ in 0..self.visible_count {
                self.working.push_back(tick);
            }
            self.initialized = true;
            return;
        }

        self.queue.push_back(tick);
        if matches!(self.playback, Playback::Idle) {
            self.begin_cycle(now_ms);
        }
    }

    fn begin_cycle(&mut self, now_ms: i64) {
        let Some(tick) = self.queue.pop_front() else {
            self.playback = Playback::Idle;
            return;
        };

        self.working.push_back(tick);

        let backlog = self.queue.len() as f64;
        let duration_ms = CHART.animation.base_duration_ms
            / (1.0 + backlog * CHART.animation.backlog_factor);

        if DF.log_animation {
            log::info!(
                "ANIM: cycle start at {} ({}ms, backlog {})",
                now_ms,
                duration_ms as i64,
                backlog
            );
        }

        self.playback = Playback::Playing {
            started_ms: now_ms,
            duration_ms,
        };
    }

    /// Drive playback from the frame clock. Returns the scroll progress of
    /// the in-flight cycle in `0.0..1.0` (0.0 when idle).
    ///
    /// A frame that lands past the transition end completes the cycle at its
    /// scheduled end time, so back-to-back cycles stay deterministic even
    /// under a stalled frame clock.
    pub fn advance(&mut self, now_ms: i64) -> f32 {
        if !self.alive {
            return 0.0;
        }

        while let Playback::Playing {
            started_ms,
            duration_ms,
        } = self.playback
        {
            let ends_at = started_ms + duration_ms.ceil() as i64;
            if now_ms < ends_at {
                break;
            }

            // Completion: the scroll lands, the oldest sample leaves.
            self.working.pop_front();
            if self.queue.is_empty() {
                self.playback = Playback::Idle;
            } else {
                self.begin_cycle(ends_at);
            }
        }

        match self.playback {
            Playback::Idle => 0.0,
            Playback::Playing {
                started_ms,
                duration_ms,
            } => (((now_ms - started_ms) as f64 / duration_ms).clamp(0.0, 1.0)) as f32,
        }
    }

    /// The series the render surface draws: `visible_count` samples when
    /// idle, `visible_count + 1` while a scroll is in flight.
    pub fn series(&self) -> &VecDeque<Tick> {
        &self.working
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.playback, Playback::Playing { .. })
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// The x-axis anchors on this time extent: the pre-append window while
    /// playing, the whole series when idle. That way the freshly appended
    /// sample starts past the right edge and scrolls in.
    pub fn x_domain(&self) -> Option<(i64, i64)> {
        if self.working.is_empty() {
            return None;
        }
        let last_idx = if self.is_playing() {
            self.working.len().saturating_sub(2)
        } else {
            self.working.len() - 1
        };
        Some((self.working.front()?.time, self.working[last_idx].time))
    }

    pub fn teardown(&mut self) {
        self.alive = false;
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: f64 = 800.0; // keep in sync with CHART.animation.base_duration_ms

    fn tick(n: i64) -> Tick {
        Tick::new(n * 1000, 50_000.0 + n as f64)
    }

    fn init(visible: usize) -> AnimationScheduler {
        let mut s = AnimationScheduler::new(visible);
        s.enqueue(tick(0), 0);
        s
    }

    #[test]
    fn first_tick_fills_the_series_without_playing() {
        let s = init(5);
        assert_eq!(s.series().len(), 5);
        assert!(s.series().iter().all(|t| t.price == 50_000.0));
        assert!(!s.is_playing());
    }

    #[test]
    fn cycle_appends_then_evicts_keeping_length_constant() {
        let mut s = init(5);

        s.enqueue(tick(1), 1_000);
        assert!(s.is_playing());
        assert_eq!(s.series().len(), 6); // append landed, evict pending

        let progress = s.advance(1_400);
        assert!(progress > 0.0 && progress < 1.0);
        assert_eq!(s.series().len(), 6);

        s.advance(1_000 + BASE as i64);
        assert!(!s.is_playing());
        assert_eq!(s.series().len(), 5);
        assert_eq!(s.series().back().unwrap().price, tick(1).price);
    }

    #[test]
    fn all_enqueued_ticks_play_in_arrival_order_exactly_once() {
        let visible = 4;
        let mut s = init(visible);

        let q = 9;
        for n in 1..=q {
            s.enqueue(tick(n), 1_000);
        }

        // Drive the clock far enough to drain everything, checking the
        // steady-state length invariant after every completed cycle.
        let mut now = 1_000;
        while s.is_playing() {
            now += 50;
            s.advance(now);
            assert!(s.series().len() == visible || s.series().len() == visible + 1);
        }

        assert_eq!(s.series().len(), visible);
        assert_eq!(s.queue_len(), 0);

        // Final window is the last `visible` ticks, in order.
        let prices: Vec<f64> = s.series().iter().map(|t| t.price).collect();
        let expected: Vec<f64> = (q - visible as i64 + 1..=q).map(|n| tick(n).price).collect();
        assert_eq!(prices, expected);
    }

    #[test]
    fn backlog_shortens_the_cycle_duration() {
        let mut s = init(4);
        for n in 1..=5 {
            s.enqueue(tick(n), 0);
        }
        // Cycle 1 starts with an empty queue behind it: full base duration,
        // ending at t=800. Cycle 2 then sees a backlog of 3, so it runs for
        // base / (1 + 3k) = 320ms and ends at t=1120.
        let k = CHART.animation.backlog_factor;
        let cycle2 = BASE / (1.0 + 3.0 * k);
        let cycle2_ends = BASE as i64 + cycle2.ceil() as i64;

        s.advance(cycle2_ends + 1);

        // Two cycles done, a third in flight: two ticks left in the queue.
        // Without the speed-up, cycle 2 would still be playing here.
        assert_eq!(s.queue_len(), 2);
        assert!(s.is_playing());
    }

    #[test]
    fn enqueue_during_playback_never_interrupts() {
        let mut s = init(3);
        s.enqueue(tick(1), 0);
        let before = s.advance(100);

        s.enqueue(tick(2), 100);
        let after = s.advance(100);

        // Progress of the in-flight cycle is unaffected by the new arrival.
        assert_eq!(before, after);
        assert_eq!(s.queue_len(), 1);
    }

    #[test]
    fn x_domain_pins_to_the_pre_append_window_while_playing() {
        let mut s = init(3);
        let idle_domain = s.x_domain().unwrap();

        s.enqueue(tick(1), 0);
        assert_eq!(s.x_domain().unwrap(), idle_domain);

        s.advance(BASE as i64 + 1);
        let settled = s.x_domain().unwrap();
        assert_eq!(settled.1, tick(1).time);
    }

    #[test]
    fn teardown_makes_completion_a_no_op() {
        let mut s = init(3);
        s.enqueue(tick(1), 0);
        assert_eq!(s.series().len(), 4);

        s.teardown();

        // The in-flight transition's completion must not mutate anything.
        assert_eq!(s.advance(10_000), 0.0);
        assert_eq!(s.series().len(), 4);

        // And nothing new is accepted.
        s.enqueue(tick(2), 10_000);
        assert_eq!(s.queue_len(), 0);
    }
}
