/// Fixed-capacity moving average over filtered rates
///
/// Maintains a circular buffer of the last N values together with an
/// incrementally updated rolling sum: each insertion subtracts the entry it
/// overwrites and adds the new one, so the mean costs O(1) per cycle
/// regardless of window size. The result is identical to re-summing the
/// whole buffer every cycle (verified against a naive oracle in tests).
///
/// Until the buffer has filled once, the mean divides by the number of
/// entries actually present rather than by capacity, and `is_warming_up`
/// reports true.
pub struct RateWindow {
    buffer: Vec<f64>,
    index: usize,
    filled: bool,
    rolling_sum: f64,
}

impl RateWindow {
    /// Create a window averaging the last `capacity` values
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be non-zero");
        Self {
            buffer: vec![0.0; capacity],
            index: 0,
            filled: false,
            rolling_sum: 0.0,
        }
    }

    /// Insert a value, evicting the oldest once full, and return the mean
    pub fn push(&mut self, value: f64) -> f64 {
        self.rolling_sum -= self.buffer[self.index];
        self.rolling_sum += value;
        self.buffer[self.index] = value;
        self.index = (self.index + 1) % self.buffer.len();

        if self.index == 0 {
            self.filled = true;
        }

        self.average()
    }

    /// Mean of the values currently held
    pub fn average(&self) -> f64 {
        let count = if self.filled {
            self.buffer.len()
        } else {
            self.index.max(1)
        };
        self.rolling_sum / count as f64
    }

    /// True until the window has been filled once
    pub fn is_warming_up(&self) -> bool {
        !self.filled
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::VecDeque;

    #[test]
    fn test_partial_window_divides_by_count() {
        let mut window = RateWindow::new(3);

        assert_relative_eq!(window.push(1.0), 1.0);
        assert_relative_eq!(window.push(2.0), 1.5);
        assert_relative_eq!(window.push(3.0), 2.0);
        assert_relative_eq!(window.push(4.0), 3.0); // (2+3+4)/3
        assert_relative_eq!(window.push(5.0), 4.0); // (3+4+5)/3
    }

    #[test]
    fn test_warm_up_flag_clears_on_first_fill() {
        let mut window = RateWindow::new(3);
        assert!(window.is_warming_up());
        window.push(1.0);
        window.push(1.0);
        assert!(window.is_warming_up());
        window.push(1.0);
        assert!(!window.is_warming_up());
    }

    #[test]
    fn test_oldest_value_evicted_after_capacity_plus_one() {
        let mut window = RateWindow::new(4);
        window.push(99.0);
        for _ in 0..4 {
            window.push(1.0);
        }
        assert!(!window.buffer.contains(&99.0));
        assert_relative_eq!(window.average(), 1.0);
    }

    #[test]
    fn test_incremental_sum_matches_naive_oracle() {
        let mut window = RateWindow::new(16);
        let mut oracle: VecDeque<f64> = VecDeque::new();

        // A deliberately awkward sequence: alternating signs, growing
        // magnitudes, a few large outliers.
        for i in 0..200 {
            let value = match i % 7 {
                0 => 1000.0,
                1 => -0.001,
                _ => (i as f64) * if i % 2 == 0 { 1.0 } else { -1.0 },
            };

            oracle.push_back(value);
            if oracle.len() > 16 {
                oracle.pop_front();
            }
            let expected: f64 = oracle.iter().sum::<f64>() / oracle.len() as f64;

            assert_relative_eq!(window.push(value), expected, max_relative = 1e-9);
        }
    }

    #[test]
    #[should_panic(expected = "window capacity must be non-zero")]
    fn test_zero_capacity_panics() {
        RateWindow::new(0);
    }
}
