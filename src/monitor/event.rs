use std::fmt;

use serde::Serialize;

/// Verdict on the smoothed closing rate for one cycle
///
/// The sign convention comes from the rate estimator: a negative moving
/// average means waypoint distance is shrinking. The boundary is
/// non-strict — an average of exactly 0.0 classifies as `NoProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    /// Net reduction in waypoint distance over the window
    Progressing,
    /// Distance holding or growing; possible flyaway or control failure
    NoProgress,
}

impl Classification {
    pub fn from_average(moving_average_m_s: f64) -> Self {
        if moving_average_m_s < 0.0 {
            Classification::Progressing
        } else {
            Classification::NoProgress
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Progressing => write!(f, "PROGRESS"),
            Classification::NoProgress => write!(f, "NO PROGRESS"),
        }
    }
}

/// Commanded-vs-measured angular rate diagnostics attached to an event
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AttitudeDiagnostics {
    pub commanded_roll_rate: f64,
    pub measured_roll_rate: f64,
    /// commanded minus measured
    pub roll_rate_error: f64,
}

/// One cycle's classified output from the progress monitor
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    /// Sample timestamp in seconds since vehicle boot
    pub timestamp_s: f64,
    /// Distance to the active waypoint, m
    pub distance_m: f64,
    /// Windowed mean closing rate, m/s (negative = closing)
    pub moving_average_m_s: f64,
    /// Post-filter instantaneous rate that entered the window, m/s
    pub instantaneous_rate_m_s: f64,
    /// True when the raw rate was rejected and the previous average
    /// substituted
    pub spike_rejected: bool,
    /// True until the averaging window has filled once; the average is not
    /// yet trustworthy
    pub warming_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_track_error_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attitude: Option<AttitudeDiagnostics>,
    pub classification: Classification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_average_is_no_progress() {
        assert_eq!(
            Classification::from_average(0.0),
            Classification::NoProgress
        );
    }

    #[test]
    fn test_barely_negative_average_is_progressing() {
        assert_eq!(
            Classification::from_average(-0.0001),
            Classification::Progressing
        );
    }

    #[test]
    fn test_negative_zero_is_no_progress() {
        // -0.0 < 0.0 is false in IEEE-754, so it lands on the NoProgress
        // side like exact zero.
        assert_eq!(
            Classification::from_average(-0.0),
            Classification::NoProgress
        );
    }
}
