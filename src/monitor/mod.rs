//! The progress-monitoring pipeline.
//!
//! One sample per cycle flows Ingest → rate estimation → spike rejection →
//! windowed averaging → classification. `ProgressMonitor` owns all state and
//! is driven either directly (tests, embedding) or by `MonitorTask`, which
//! adds the polling loop, stale-data handling and cancellation.

pub mod event;
pub mod rate;
pub mod spike;
pub mod task;
pub mod window;

pub use event::{AttitudeDiagnostics, Classification, ProgressEvent};
pub use rate::RateEstimator;
pub use spike::SpikeFilter;
pub use task::{MonitorTask, ShutdownHandle};
pub use window::RateWindow;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::telemetry::{AttitudeSample, TelemetrySample};

/// Streaming waypoint-progress anomaly detector
///
/// Owns the whole per-cycle pipeline and every piece of monitor state.
/// Strictly single-threaded: one `update` call per delivered sample, no
/// locking anywhere.
pub struct ProgressMonitor {
    estimator: RateEstimator,
    filter: SpikeFilter,
    window: RateWindow,
    last_average_m_s: f64,
    sample_count: u64,
    held_attitude: Option<AttitudeSample>,
    attitude_staleness_s: f64,
}

impl ProgressMonitor {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            estimator: RateEstimator::new(),
            filter: SpikeFilter::new(config.filter.spike_threshold_m_s),
            window: RateWindow::new(config.window.size),
            last_average_m_s: 0.0,
            sample_count: 0,
            held_attitude: None,
            attitude_staleness_s: config.attitude.staleness_ms as f64 / 1000.0,
        }
    }

    /// Process one telemetry sample through the full pipeline
    ///
    /// Returns `Ok(None)` for the priming (first) sample, which produces no
    /// rate. A degenerate sample (non-positive elapsed time) is an error and
    /// leaves all state exactly as it was.
    pub fn update(&mut self, sample: &TelemetrySample) -> Result<Option<ProgressEvent>> {
        let raw_rate = self
            .estimator
            .update(sample.wp_distance_m, sample.timestamp_s())?;

        self.sample_count += 1;

        let Some(raw_rate) = raw_rate else {
            return Ok(None);
        };

        let (filtered_rate, spike_rejected) = self.filter.filter(raw_rate, self.last_average_m_s);
        let moving_average = self.window.push(filtered_rate);
        self.last_average_m_s = moving_average;

        let event = ProgressEvent {
            timestamp_s: sample.timestamp_s(),
            distance_m: sample.wp_distance_m,
            moving_average_m_s: moving_average,
            instantaneous_rate_m_s: filtered_rate,
            spike_rejected,
            warming_up: self.window.is_warming_up(),
            cross_track_error_m: sample.cross_track_error_m,
            attitude: self.attitude_diagnostics(sample),
            classification: Classification::from_average(moving_average),
        };

        Ok(Some(event))
    }

    /// Record the latest reading from the optional attitude channel
    ///
    /// The monitor holds only the newest reading and ages it out against the
    /// configured staleness bound when attaching diagnostics to events.
    pub fn observe_attitude(&mut self, attitude: AttitudeSample) {
        self.held_attitude = Some(attitude);
    }

    /// Most recent moving average, 0.0 before any rate has been inserted
    pub fn moving_average(&self) -> f64 {
        self.last_average_m_s
    }

    /// Number of samples accepted, including the priming sample
    pub fn samples_seen(&self) -> u64 {
        self.sample_count
    }

    pub fn is_warming_up(&self) -> bool {
        self.window.is_warming_up()
    }

    fn attitude_diagnostics(&self, sample: &TelemetrySample) -> Option<AttitudeDiagnostics> {
        // Prefer the dedicated attitude channel when its reading is fresh
        // relative to this telemetry sample.
        if let Some(held) = &self.held_attitude {
            let age_s = sample.timestamp_s() - held.timestamp_s();
            if age_s.abs() <= self.attitude_staleness_s {
                return Some(AttitudeDiagnostics {
                    commanded_roll_rate: held.commanded_roll_rate,
                    measured_roll_rate: held.measured_roll_rate,
                    roll_rate_error: held.commanded_roll_rate - held.measured_roll_rate,
                });
            }
        }

        // Fall back to rates the telemetry publisher inlined, if both halves
        // are present.
        match (sample.nav_roll_rate, sample.measured_roll_rate) {
            (Some(commanded), Some(measured)) => Some(AttitudeDiagnostics {
                commanded_roll_rate: commanded,
                measured_roll_rate: measured,
                roll_rate_error: commanded - measured,
            }),
            _ => None,
        }
    }
}
