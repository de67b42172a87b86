/// Spike rejection for instantaneous rates
///
/// When a new waypoint is issued the reported distance jumps
/// discontinuously, which differences into an enormous one-cycle rate. Any
/// rate whose magnitude exceeds the threshold is treated as such an artifact
/// and replaced with the previous cycle's moving average, so the substitute
/// (never the raw spike) is what enters the averaging window.
pub struct SpikeFilter {
    threshold_m_s: f64,
}

impl SpikeFilter {
    /// Create a filter with the given rejection bound in m/s
    pub fn new(threshold_m_s: f64) -> Self {
        Self { threshold_m_s }
    }

    /// Filter one instantaneous rate against the previous moving average
    ///
    /// Returns the value to insert into the window and whether the raw rate
    /// was rejected.
    pub fn filter(&self, rate_m_s: f64, previous_average_m_s: f64) -> (f64, bool) {
        if rate_m_s.abs() > self.threshold_m_s {
            (previous_average_m_s, true)
        } else {
            (rate_m_s, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_rate_passes_through() {
        let filter = SpikeFilter::new(100.0);
        assert_eq!(filter.filter(-12.5, -10.0), (-12.5, false));
    }

    #[test]
    fn test_spike_replaced_with_previous_average() {
        let filter = SpikeFilter::new(100.0);
        assert_eq!(filter.filter(495.0, -9.8), (-9.8, true));
        assert_eq!(filter.filter(-495.0, -9.8), (-9.8, true));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let filter = SpikeFilter::new(100.0);
        assert_eq!(filter.filter(100.0, -5.0), (100.0, false));
        assert_eq!(filter.filter(100.0001, -5.0), (-5.0, true));
    }
}
