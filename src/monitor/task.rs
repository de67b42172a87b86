use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::{Classification, ProgressEvent, ProgressMonitor};
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::telemetry::{AttitudeSource, Poll, TelemetrySource};

/// Always log the first N consecutive channel faults.
const FAULT_LOG_HEAD: u32 = 10;
/// After that, log only every Nth to keep a wedged transport from flooding.
const FAULT_LOG_PERIOD: u32 = 50;

/// Cooperative stop signal for a running `MonitorTask`
///
/// Cheap to clone; flipping it from any thread makes the loop exit at the
/// next iteration boundary.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The monitor's run loop: poll, pipeline, emit, repeat
///
/// Single-threaded and cooperative. Each iteration waits on the telemetry
/// source with a bounded timeout, runs the pipeline synchronously to
/// completion, then waits again. Nothing here is fatal: stale data skips the
/// cycle, channel faults are logged at a decaying rate, degenerate samples
/// are dropped. The loop ends when the source closes or the shutdown handle
/// fires.
pub struct MonitorTask {
    monitor: ProgressMonitor,
    source: Box<dyn TelemetrySource>,
    attitude_source: Option<Box<dyn AttitudeSource>>,
    poll_timeout: Duration,
    attitude_interval: Duration,
    last_attitude_poll: Option<Instant>,
    stop: Arc<AtomicBool>,
}

impl MonitorTask {
    pub fn new(config: &MonitorConfig, source: Box<dyn TelemetrySource>) -> Self {
        Self {
            monitor: ProgressMonitor::new(config),
            source,
            attitude_source: None,
            poll_timeout: Duration::from_millis(config.telemetry.poll_timeout_ms),
            attitude_interval: Duration::from_secs_f64(
                config.attitude.delivery_rate.as_interval_ms() / 1000.0,
            ),
            last_attitude_poll: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach the optional commanded-vs-measured attitude channel
    pub fn with_attitude_source(mut self, source: Box<dyn AttitudeSource>) -> Self {
        self.attitude_source = Some(source);
        self
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.stop),
        }
    }

    /// Run until the source closes or the shutdown handle fires
    ///
    /// `on_event` is called once per classified cycle, after the structured
    /// log line for that cycle has been emitted.
    pub fn run<F>(&mut self, mut on_event: F) -> Result<()>
    where
        F: FnMut(&ProgressEvent),
    {
        let mut consecutive_faults: u32 = 0;

        while !self.stop.load(Ordering::Relaxed) {
            self.poll_attitude();

            match self.source.poll(self.poll_timeout) {
                Poll::Sample(sample) => {
                    consecutive_faults = 0;
                    match self.monitor.update(&sample) {
                        Ok(Some(event)) => {
                            log_event(&event);
                            on_event(&event);
                        }
                        Ok(None) => {
                            log::debug!("Primed on first sample at t={:.3}s", sample.timestamp_s());
                        }
                        Err(e) => {
                            log::warn!("Dropping sample at t={:.3}s: {}", sample.timestamp_s(), e);
                        }
                    }
                }
                Poll::Timeout => {
                    log::warn!(
                        "No telemetry within {:?}; holding previous state",
                        self.poll_timeout
                    );
                }
                Poll::Error(e) => {
                    if consecutive_faults < FAULT_LOG_HEAD
                        || consecutive_faults % FAULT_LOG_PERIOD == 0
                    {
                        log::error!(
                            "Telemetry wait failed ({} consecutive): {}",
                            consecutive_faults + 1,
                            e
                        );
                    }
                    consecutive_faults += 1;
                }
                Poll::Closed => {
                    log::info!(
                        "Telemetry source closed after {} samples",
                        self.monitor.samples_seen()
                    );
                    break;
                }
            }
        }

        Ok(())
    }

    pub fn monitor(&self) -> &ProgressMonitor {
        &self.monitor
    }

    /// Poll the attitude channel at its own configured cadence, never the
    /// telemetry channel's.
    fn poll_attitude(&mut self) {
        let Some(attitude) = self.attitude_source.as_mut() else {
            return;
        };
        let due = self
            .last_attitude_poll
            .is_none_or(|at| at.elapsed() >= self.attitude_interval);
        if !due {
            return;
        }
        self.last_attitude_poll = Some(Instant::now());
        if let Some(reading) = attitude.try_poll() {
            self.monitor.observe_attitude(reading);
        }
    }
}

fn log_event(event: &ProgressEvent) {
    let label = match event.classification {
        Classification::Progressing => "PROGRESS ----",
        Classification::NoProgress => "NO PROGRESS -",
    };
    let xtrack = event
        .cross_track_error_m
        .map_or("-".to_string(), |v| format!("{:8.4}", v));

    log::info!(
        "{} WP Dist (m): {:8.4}  MA Rate (m/s): {:8.4}  Inst Rate (m/s): {:8.4}  Xtrack Err: {}{}",
        label,
        event.distance_m,
        event.moving_average_m_s,
        event.instantaneous_rate_m_s,
        xtrack,
        if event.warming_up { "  [warming up]" } else { "" }
    );
}
