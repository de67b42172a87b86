use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::config::UpdateRate;
use crate::telemetry::TelemetrySample;

/// A scheduled waypoint change: the reported distance jumps discontinuously
/// at `at_s`, exactly the artifact the spike filter exists to suppress.
#[derive(Debug, Clone, Copy)]
pub struct WaypointSwitch {
    pub at_s: f64,
    pub new_distance_m: f64,
}

/// A stretch of mission time during which the vehicle makes no progress
#[derive(Debug, Clone, Copy)]
pub struct StallSegment {
    pub start_s: f64,
    pub end_s: f64,
}

/// Generator for a synthetic telemetry stream
///
/// Models a vehicle closing on its waypoint at a commanded speed with
/// Gaussian distance noise, optional scheduled waypoint switches and an
/// optional stall segment. Deterministic for a given seed.
pub struct MissionProfile {
    pub initial_distance_m: f64,
    pub closing_speed_m_s: f64,
    pub sample_rate: UpdateRate,
    pub distance_noise_std_m: f64,
    pub cross_track_noise_std_m: f64,
    pub waypoint_switches: Vec<WaypointSwitch>,
    pub stall: Option<StallSegment>,
    pub seed: u64,
}

impl Default for MissionProfile {
    fn default() -> Self {
        Self {
            initial_distance_m: 500.0,
            closing_speed_m_s: 10.0,
            sample_rate: UpdateRate::default(),
            distance_noise_std_m: 0.25,
            cross_track_noise_std_m: 0.5,
            waypoint_switches: Vec::new(),
            stall: None,
            seed: 0,
        }
    }
}

impl MissionProfile {
    /// Generate `duration_s` worth of samples at the profile's sample rate
    pub fn generate(&self, duration_s: f64) -> Vec<TelemetrySample> {
        let interval_s = self.sample_rate.as_interval_ms() / 1000.0;
        let count = (duration_s / interval_s) as usize;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let distance_noise = Normal::new(0.0, self.distance_noise_std_m.max(f64::MIN_POSITIVE))
            .expect("valid std dev");
        let xtrack_noise = Normal::new(0.0, self.cross_track_noise_std_m.max(f64::MIN_POSITIVE))
            .expect("valid std dev");
        let rate_noise = Normal::new(0.0, 0.01).expect("valid std dev");

        let mut distance_m = self.initial_distance_m;
        let mut switches = self.waypoint_switches.clone();
        switches.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
        let mut next_switch = 0;

        let mut samples = Vec::with_capacity(count);
        for i in 0..count {
            let t = i as f64 * interval_s;

            if next_switch < switches.len() && t >= switches[next_switch].at_s {
                distance_m = switches[next_switch].new_distance_m;
                next_switch += 1;
            } else if i > 0 && !self.stalled_at(t) {
                distance_m = (distance_m - self.closing_speed_m_s * interval_s).max(0.0);
            }

            let commanded = (t * 0.5).sin() * 0.2;
            samples.push(TelemetrySample {
                timestamp_us: (t * 1_000_000.0) as u64,
                wp_distance_m: (distance_m + distance_noise.sample(&mut rng)).max(0.0),
                cross_track_error_m: Some(xtrack_noise.sample(&mut rng)),
                nav_roll_rate: Some(commanded),
                measured_roll_rate: Some(commanded + rate_noise.sample(&mut rng)),
            });
        }

        samples
    }

    fn stalled_at(&self, t: f64) -> bool {
        self.stall
            .map(|s| t >= s.start_s && t < s.end_s)
            .unwrap_or(false)
    }
}
