use std::collections::VecDeque;

use super::Tick;

/// Bounded FIFO window of recent ticks, owned by one chart session.
///
/// Appending past capacity evicts the single oldest sample. Insertion order
/// is significant and preserved; duplicate timestamps are permitted (the
/// feed never deduplicates).
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    ticks: VecDeque<Tick>,
    max_points: usize,
}

impl HistoryBuffer {
    pub fn new(max_points: usize) -> Self {
        Self {
            ticks: VecDeque::with_capacity(max_points + 1),
            max_points,
        }
    }

    /// Push to tail; drop head once over capacity. O(1) amortized.
    pub fn append(&mut self, tick: Tick) {
        self.ticks.push_back(tick);
        if self.ticks.len() > self.max_points {
            self.ticks.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn latest(&self) -> Option<&Tick> {
        self.ticks.back()
    }

    pub fn oldest(&self) -> Option<&Tick> {
        self.ticks.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tick> {
        self.ticks.iter()
    }

    /// (min_time, max_time) of the window, None when empty. Ticks arrive in
    /// time order so the ends of the deque are the extent.
    pub fn time_extent(&self) -> Option<(i64, i64)> {
        Some((self.ticks.front()?.time, self.ticks.back()?.time))
    }

    /// (min_price, max_price) across the window, None when empty.
    pub fn price_extent(&self) -> Option<(f64, f64)> {
        let mut it = self.ticks.iter();
        let first = it.next()?.price;
        let (mut lo, mut hi) = (first, first);
        for t in it {
            lo = lo.min(t.price);
            hi = hi.max(t.price);
        }
        Some((lo, hi))
    }
}
