//! Fixed-size in-memory history of one metric, for graphing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_CAPACITY: usize = 120;
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 60;
pub const MIN_Y_SCALE: f32 = 0.1;
pub const MAX_Y_SCALE: f32 = 2.0;

/// Ring buffer of the most recent values of a metric.
///
/// Pushes are rate-limited to `fps` per second and ignored while paused.
/// The oldest point is dropped once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct MetricHistory {
    values: VecDeque<f32>,
    capacity: usize,
    paused: bool,
    fps: u32,
    y_scale: f32,
    current: f32,
    last_push: Option<Instant>,
}

impl Default for MetricHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl MetricHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
            paused: false,
            fps: MAX_FPS,
            y_scale: 1.0,
            current: 0.0,
            last_push: None,
        }
    }

    pub fn push(&mut self, value: f32) -> bool {
        self.push_at(Instant::now(), value)
    }

    /// Appends `value` unless paused or called again within `1 / fps`.
    /// Returns whether the value was accepted.
    pub fn push_at(&mut self, now: Instant, value: f32) -> bool {
        if self.paused {
            return false;
        }
        if let Some(last) = self.last_push
            && now.saturating_duration_since(last) < self.min_interval()
        {
            return false;
        }

        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
        self.current = value;
        self.last_push = Some(now);
        true
    }

    fn min_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }

    pub fn values(&self) -> &VecDeque<f32> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Last accepted value, 0 before the first push.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// `(index, value)` pairs, as chart data.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, f64::from(*v)))
            .collect()
    }

    /// Upper bound of the y axis for a graph whose unscaled maximum is
    /// `base`.
    pub fn y_bound(&self, base: f64) -> f64 {
        base * f64::from(self.y_scale)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_paused(&mut self) {
        self.paused = !self.paused;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.clamp(MIN_FPS, MAX_FPS);
    }

    pub fn y_scale(&self) -> f32 {
        self.y_scale
    }

    pub fn set_y_scale(&mut self, scale: f32) {
        self.y_scale = scale.clamp(MIN_Y_SCALE, MAX_Y_SCALE);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.current = 0.0;
        self.last_push = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_drops_oldest_at_capacity() {
        let mut history = MetricHistory::new(3);
        let t0 = Instant::now();
        for (i, v) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
            assert!(history.push_at(t0 + Duration::from_secs(i as u64), v));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.values().iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(history.current(), 4.0);
    }

    #[test]
    fn test_paused_ignores_pushes() {
        let mut history = MetricHistory::default();
        history.set_paused(true);
        assert!(!history.push(5.0));
        assert!(history.is_empty());
        assert_eq!(history.current(), 0.0);

        history.toggle_paused();
        assert!(history.push(5.0));
        assert_eq!(history.current(), 5.0);
    }

    #[test]
    fn test_fps_limits_push_rate() {
        let mut history = MetricHistory::default();
        history.set_fps(2);
        let t0 = Instant::now();

        assert!(history.push_at(t0, 1.0));
        assert!(!history.push_at(t0 + Duration::from_millis(400), 2.0));
        assert!(history.push_at(t0 + Duration::from_millis(500), 3.0));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_settings_are_clamped() {
        let mut history = MetricHistory::new(0);
        assert_eq!(history.capacity(), 1);

        history.set_fps(0);
        assert_eq!(history.fps(), MIN_FPS);
        history.set_fps(1000);
        assert_eq!(history.fps(), MAX_FPS);

        history.set_y_scale(0.0);
        assert_eq!(history.y_scale(), MIN_Y_SCALE);
        history.set_y_scale(9.0);
        assert_eq!(history.y_scale(), MAX_Y_SCALE);
    }

    #[test]
    fn test_points_and_y_bound() {
        let mut history = MetricHistory::new(4);
        history.set_y_scale(2.0);
        history.push(10.0);
        assert_eq!(history.points(), vec![(0.0, 10.0)]);
        assert_eq!(history.y_bound(100.0), 200.0);
    }
}
