use std::collections::VecDeque;

use approx::assert_relative_eq;
use flywatch::config::MonitorConfig;
use flywatch::monitor::{Classification, ProgressMonitor};
use flywatch::telemetry::TelemetrySample;

fn sample(timestamp_s: f64, distance_m: f64) -> TelemetrySample {
    TelemetrySample {
        timestamp_us: (timestamp_s * 1_000_000.0) as u64,
        wp_distance_m: distance_m,
        cross_track_error_m: None,
        nav_roll_rate: None,
        measured_roll_rate: None,
    }
}

fn config_with_window(size: usize) -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.window.size = size;
    config
}

#[test]
fn test_steady_progress_converges_within_one_window_fill() {
    // 10 m/s of closing at 1 Hz against the full default 240-sample window.
    let config = MonitorConfig::default();
    let mut monitor = ProgressMonitor::new(&config);

    let mut last = None;
    for i in 0..=240u64 {
        let distance = 10_000.0 - 10.0 * i as f64;
        last = monitor.update(&sample(i as f64, distance)).unwrap();
    }

    let event = last.unwrap();
    assert_relative_eq!(event.instantaneous_rate_m_s, -10.0);
    assert_relative_eq!(event.moving_average_m_s, -10.0);
    assert_eq!(event.classification, Classification::Progressing);
    assert!(!event.warming_up, "window must be full after 240 rates");
}

#[test]
fn test_warm_up_is_flagged_until_window_fills() {
    let mut monitor = ProgressMonitor::new(&config_with_window(5));
    monitor.update(&sample(0.0, 100.0)).unwrap();

    for i in 1..=4u64 {
        let event = monitor
            .update(&sample(i as f64, 100.0 - 10.0 * i as f64))
            .unwrap()
            .unwrap();
        assert!(event.warming_up, "cycle {} should still be warming up", i);
        // Partial-window mean divides by the entries present, so it is
        // already the true rate, not a zero-diluted one.
        assert_relative_eq!(event.moving_average_m_s, -10.0);
    }

    let event = monitor.update(&sample(5.0, 50.0)).unwrap().unwrap();
    assert!(!event.warming_up);
}

#[test]
fn test_waypoint_reset_spike_is_suppressed() {
    let mut monitor = ProgressMonitor::new(&config_with_window(8));

    // Steady 10 m/s progress down to 5 m.
    let mut t = 0.0;
    let mut last_average = 0.0;
    for i in 0..=10u64 {
        let distance = 105.0 - 10.0 * i as f64;
        if let Some(event) = monitor.update(&sample(t, distance)).unwrap() {
            last_average = event.moving_average_m_s;
        }
        t += 1.0;
    }
    assert_relative_eq!(last_average, -10.0);

    // New waypoint issued: distance jumps 5 m -> 500 m, a +495 m/s spike.
    let event = monitor.update(&sample(t, 500.0)).unwrap().unwrap();
    assert!(event.spike_rejected);
    // The substitute is the previous cycle's moving average, verbatim.
    assert_relative_eq!(event.instantaneous_rate_m_s, last_average);
    // No discontinuity: the window absorbed its own mean.
    assert_relative_eq!(event.moving_average_m_s, last_average);
    assert_eq!(event.classification, Classification::Progressing);

    // Progress against the new waypoint keeps the estimate sane.
    let event = monitor.update(&sample(t + 1.0, 490.0)).unwrap().unwrap();
    assert!(!event.spike_rejected);
    assert_relative_eq!(event.instantaneous_rate_m_s, -10.0);
}

#[test]
fn test_classification_boundary_is_non_strict() {
    // Constant distance: every rate is exactly 0.0.
    let mut monitor = ProgressMonitor::new(&config_with_window(4));
    monitor.update(&sample(0.0, 42.0)).unwrap();
    let event = monitor.update(&sample(1.0, 42.0)).unwrap().unwrap();
    assert_relative_eq!(event.moving_average_m_s, 0.0);
    assert_eq!(event.classification, Classification::NoProgress);

    // The faintest closing rate flips the verdict.
    let mut monitor = ProgressMonitor::new(&config_with_window(4));
    monitor.update(&sample(0.0, 42.0)).unwrap();
    let event = monitor.update(&sample(1.0, 42.0 - 0.0001)).unwrap().unwrap();
    assert!(event.moving_average_m_s < 0.0);
    assert_eq!(event.classification, Classification::Progressing);
}

#[test]
fn test_degenerate_sample_keeps_nan_out_of_the_window() {
    let mut monitor = ProgressMonitor::new(&config_with_window(4));
    monitor.update(&sample(0.0, 100.0)).unwrap();
    monitor.update(&sample(1.0, 90.0)).unwrap();

    // Duplicate timestamp: dropped, state retained.
    assert!(monitor.update(&sample(1.0, 85.0)).is_err());
    assert!(monitor.moving_average().is_finite());

    let event = monitor.update(&sample(2.0, 80.0)).unwrap().unwrap();
    assert!(event.moving_average_m_s.is_finite());
    assert!(event.instantaneous_rate_m_s.is_finite());
    // Rate differences against the last accepted sample (90 m at t=1).
    assert_relative_eq!(event.instantaneous_rate_m_s, -10.0);
}

#[test]
fn test_moving_average_matches_naive_oracle() {
    // Drive the monitor with an awkward mission and check its O(1) rolling
    // sum against a from-scratch mean of the filtered rates each cycle.
    let window = 16;
    let threshold = 100.0;
    let mut config = config_with_window(window);
    config.filter.spike_threshold_m_s = threshold;
    let mut monitor = ProgressMonitor::new(&config);

    let mut oracle: VecDeque<f64> = VecDeque::new();
    let mut prev: Option<(f64, f64)> = None;
    let mut last_oracle_average = 0.0;

    for i in 0..300u64 {
        let t = i as f64 * 0.2;
        // Sawtooth mission: steady closing with a waypoint jump every 60
        // samples and some deterministic wiggle.
        let base = 1000.0 - (i % 60) as f64 * 2.0 + ((i as f64) * 0.7).sin();
        let distance = if i % 60 == 0 { 1000.0 } else { base };

        let maybe_event = monitor.update(&sample(t, distance)).unwrap();

        let Some((prev_d, prev_t)) = prev else {
            prev = Some((distance, t));
            continue;
        };
        prev = Some((distance, t));

        let raw = (prev_d - distance) / (prev_t - t);
        let filtered = if raw.abs() > threshold {
            last_oracle_average
        } else {
            raw
        };
        oracle.push_back(filtered);
        if oracle.len() > window {
            oracle.pop_front();
        }
        last_oracle_average = oracle.iter().sum::<f64>() / oracle.len() as f64;

        let event = maybe_event.expect("event expected after priming");
        assert_relative_eq!(
            event.moving_average_m_s,
            last_oracle_average,
            max_relative = 1e-9
        );
    }
}
