use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;

/// Weighted two-bucket sliding window: the previous window's count decays
/// linearly while the current one fills.
#[derive(Debug)]
pub struct SlidingWindow {
    window_size: Duration,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
    last_seen: Instant,
}

impl SlidingWindow {
    fn new(window_size: Duration, now: Instant) -> Self {
        Self {
            window_size,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.current_window_start);
        if elapsed >= self.window_size * 2 {
            self.prev_count = 0;
            self.current_count = 0;
            self.current_window_start = now;
        } else if elapsed >= self.window_size {
            self.prev_count = self.current_count;
            self.current_count = 0;
            self.current_window_start += self.window_size;
        }
    }

    fn effective(&self, now: Instant) -> f64 {
        let elapsed = now.duration_since(self.current_window_start).as_secs_f64();
        let weight = (elapsed / self.window_size.as_secs_f64()).min(1.0);
        (self.prev_count as f64) * (1.0 - weight) + self.current_count as f64
    }

    /// Counts a hit if under `limit`, otherwise returns the seconds to wait.
    fn hit(&mut self, limit: u64, now: Instant) -> Result<(), u64> {
        self.last_seen = now;
        self.roll(now);

        if self.effective(now) < limit as f64 {
            self.current_count += 1;
            return Ok(());
        }

        let remaining = self
            .window_size
            .saturating_sub(now.duration_since(self.current_window_start));
        Err(remaining.as_secs().max(1))
    }
}

type Key = String;

/// Per-key sliding windows shared by every rate-limited operation.
#[derive(Clone, Default)]
pub struct RateLimiterStore {
    map: Arc<DashMap<Key, Arc<Mutex<SlidingWindow>>>>,
}

impl RateLimiterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_window(&self, key: &str, window_size: Duration, now: Instant) -> Arc<Mutex<SlidingWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SlidingWindow::new(window_size, now))))
            .clone()
    }

    /// Records one attempt for `key`. `Err` carries the Retry-After seconds.
    pub fn check(&self, key: &str, limit: u64, window_size: Duration) -> Result<(), u64> {
        self.check_at(key, limit, window_size, Instant::now())
    }

    fn check_at(&self, key: &str, limit: u64, window_size: Duration, now: Instant) -> Result<(), u64> {
        let window = self.get_window(key, window_size, now);
        let mut w = window.lock();
        w.hit(limit, now)
    }

    /// Removes keys not seen for `idle`; returns the number evicted.
    pub fn evict_idle(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map
            .retain(|_, window| now.duration_since(window.lock().last_seen) <= idle);
        before.saturating_sub(self.map.len())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
