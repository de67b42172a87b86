use crate::error::{MonitorError, Result};

/// Instantaneous closing-rate estimator
///
/// Differences consecutive (distance, time) pairs into a rate in m/s using
/// the convention the rest of the pipeline is built on: the rate is computed
/// as `(prev_dist - cur_dist) / (prev_time - cur_time)`, so a shrinking
/// waypoint distance yields a *negative* rate. The classifier relies on this
/// sign.
///
/// The first sample only primes the estimator; no rate is produced until a
/// prior sample exists, so the bogus zero-seeded first difference never
/// reaches the filter.
pub struct RateEstimator {
    previous: Option<(f64, f64)>,
}

impl RateEstimator {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Feed the next (distance, time) pair and return the instantaneous rate
    ///
    /// Returns `Ok(None)` for the priming sample. A non-positive elapsed
    /// time is a `DegenerateSample` error; the sample is dropped and the
    /// held previous pair is left untouched, so the next good sample
    /// differences against pre-error state.
    pub fn update(&mut self, distance_m: f64, time_s: f64) -> Result<Option<f64>> {
        match self.previous {
            None => {
                self.previous = Some((distance_m, time_s));
                Ok(None)
            }
            Some((prev_distance_m, prev_time_s)) => {
                let elapsed_s = time_s - prev_time_s;
                if elapsed_s <= 0.0 {
                    return Err(MonitorError::DegenerateSample { elapsed_s });
                }
                let rate = (prev_distance_m - distance_m) / (prev_time_s - time_s);
                self.previous = Some((distance_m, time_s));
                Ok(Some(rate))
            }
        }
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_sample_primes_only() {
        let mut est = RateEstimator::new();
        assert!(est.update(100.0, 0.0).unwrap().is_none());
    }

    #[test]
    fn test_closing_distance_is_negative_rate() {
        let mut est = RateEstimator::new();
        est.update(100.0, 0.0).unwrap();
        let rate = est.update(90.0, 1.0).unwrap().unwrap();
        assert_relative_eq!(rate, -10.0);
    }

    #[test]
    fn test_opening_distance_is_positive_rate() {
        let mut est = RateEstimator::new();
        est.update(100.0, 0.0).unwrap();
        let rate = est.update(105.0, 1.0).unwrap().unwrap();
        assert_relative_eq!(rate, 5.0);
    }

    #[test]
    fn test_duplicate_timestamp_is_degenerate() {
        let mut est = RateEstimator::new();
        est.update(100.0, 1.0).unwrap();
        let err = est.update(90.0, 1.0).unwrap_err();
        assert!(matches!(err, MonitorError::DegenerateSample { .. }));

        // The degenerate sample must not disturb held state.
        let rate = est.update(90.0, 2.0).unwrap().unwrap();
        assert_relative_eq!(rate, -10.0);
    }

    #[test]
    fn test_backwards_timestamp_is_degenerate() {
        let mut est = RateEstimator::new();
        est.update(100.0, 5.0).unwrap();
        assert!(est.update(90.0, 4.0).is_err());
    }
}
