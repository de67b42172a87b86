use serde::{Deserialize, Serialize};

/// One navigation-status record as delivered by the flight stack
///
/// Carries the distance to the active waypoint plus whatever correlating
/// diagnostics the publisher had available. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Publisher timestamp in microseconds since boot
    pub timestamp_us: u64,
    /// Distance to the active waypoint in meters
    pub wp_distance_m: f64,
    /// Lateral deviation from the planned path in meters, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_track_error_m: Option<f64>,
    /// Commanded roll rate from the navigation controller, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_roll_rate: Option<f64>,
    /// Roll rate as measured by the attitude estimator, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_roll_rate: Option<f64>,
}

impl TelemetrySample {
    /// Publisher timestamp converted to seconds
    pub fn timestamp_s(&self) -> f64 {
        self.timestamp_us as f64 / 1_000_000.0
    }
}

/// One commanded-vs-measured angular rate record from the attitude channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttitudeSample {
    /// Publisher timestamp in microseconds since boot
    pub timestamp_us: u64,
    /// Roll rate commanded by the controller, rad/s
    pub commanded_roll_rate: f64,
    /// Roll rate measured by the estimator, rad/s
    pub measured_roll_rate: f64,
}

impl AttitudeSample {
    pub fn timestamp_s(&self) -> f64 {
        self.timestamp_us as f64 / 1_000_000.0
    }
}
