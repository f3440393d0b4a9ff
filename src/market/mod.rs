use crate::models::Tick;
use std::collections::VecDeque;

/// Maximum number of ticks retained for indicator input
pub const WINDOW_CAPACITY: usize = 100;

/// Bounded rolling window of recent close/high/low samples
///
/// The three series move in lock-step: one entry per tick, oldest entry
/// evicted first once the capacity is reached. Single-writer; the engine
/// processes one tick at a time so no locking is needed.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    closes: VecDeque<f64>,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    capacity: usize,
}

impl PriceWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            closes: VecDeque::with_capacity(capacity),
            highs: VecDeque::with_capacity(capacity),
            lows: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one tick, evicting the oldest sample on overflow
    pub fn push(&mut self, tick: &Tick) {
        self.closes.push_back(tick.ask);
        self.highs.push_back(tick.high);
        self.lows.push_back(tick.low);

        while self.closes.len() > self.capacity {
            self.closes.pop_front();
            self.highs.pop_front();
            self.lows.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// The last `n` samples per series, oldest first
    ///
    /// Returns `None` when fewer than `n` samples exist.
    pub fn last_n(&self, n: usize) -> Option<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        if self.closes.len() < n {
            return None;
        }

        let tail = |series: &VecDeque<f64>| -> Vec<f64> {
            series.iter().rev().take(n).rev().copied().collect()
        };

        Some((tail(&self.closes), tail(&self.highs), tail(&self.lows)))
    }
}

impl Default for PriceWindow {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY)
    }
}
