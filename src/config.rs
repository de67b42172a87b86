//! Configuration for the flywatch progress monitor.
//!
//! All tunables default to the values the monitor was flight-tested with:
//! 5 Hz telemetry delivery, a 1 s poll timeout, a ±100 m/s spike bound and a
//! 240-sample averaging window (≈48 s at 5 Hz).
//!
//! A partial TOML file can override any subset of fields:
//!
//! ```toml
//! [window]
//! size = 120
//!
//! [filter]
//! spike_threshold_m_s = 50.0
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// Telemetry delivery rate specification
///
/// Can be specified as either a frequency in Hz or an interval in
/// milliseconds. Useful because flight stacks usually configure topic
/// subscriptions by minimum interval, while humans reason in Hz.
///
/// # Parsing formats
/// - `5` - frequency in Hz (no suffix)
/// - `5hz` or `5Hz` - frequency in Hz (explicit)
/// - `200ms` - interval in milliseconds
///
/// # Example
/// ```
/// use flywatch::config::UpdateRate;
///
/// // 200 ms interval = 5 Hz
/// let rate: UpdateRate = "200ms".parse().unwrap();
/// assert!((rate.as_hz() - 5.0).abs() < 0.001);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UpdateRate(f64);

impl UpdateRate {
    /// Create from frequency in Hz
    pub fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    /// Create from interval in milliseconds
    pub fn from_interval_ms(ms: f64) -> Self {
        Self(1000.0 / ms)
    }

    /// Get frequency in Hz
    pub fn as_hz(&self) -> f64 {
        self.0
    }

    /// Get interval in milliseconds
    pub fn as_interval_ms(&self) -> f64 {
        1000.0 / self.0
    }
}

impl Default for UpdateRate {
    fn default() -> Self {
        // 200 ms minimum delivery interval = 5 Hz
        Self::from_interval_ms(200.0)
    }
}

impl fmt::Display for UpdateRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}hz", self.0)
    }
}

impl FromStr for UpdateRate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(num) = s.strip_suffix("ms") {
            let ms: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid interval: {}", s))?;
            if ms <= 0.0 {
                return Err("interval must be positive".to_string());
            }
            return Ok(Self::from_interval_ms(ms));
        }

        let num = s
            .strip_suffix("hz")
            .or_else(|| s.strip_suffix("Hz"))
            .or_else(|| s.strip_suffix("HZ"))
            .unwrap_or(s);

        let hz: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency: {}", s))?;
        if hz <= 0.0 {
            return Err("frequency must be positive".to_string());
        }
        Ok(Self::from_hz(hz))
    }
}

impl TryFrom<String> for UpdateRate {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<UpdateRate> for String {
    fn from(rate: UpdateRate) -> Self {
        rate.to_string()
    }
}

/// System-wide monitor configuration
///
/// Contains all configuration parameters for the progress monitor. Use
/// `MonitorConfig::default()` for the flight-tested defaults, or load
/// overrides from a TOML file with `MonitorConfig::load`.
///
/// # Example
/// ```
/// use flywatch::config::MonitorConfig;
///
/// let mut config = MonitorConfig::default();
/// // Customize as needed
/// config.window.size = 120;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Telemetry input configuration
    pub telemetry: TelemetryConfig,
    /// Optional attitude-rate input configuration
    pub attitude: AttitudeConfig,
    /// Spike rejection configuration
    pub filter: FilterConfig,
    /// Moving-average window configuration
    pub window: WindowConfig,
}

impl MonitorConfig {
    /// Load configuration overrides from a TOML file
    ///
    /// Missing fields keep their defaults, so a partial file is fine.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&text).map_err(|e| MonitorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    ///
    /// Called by `load`; call it again after applying CLI overrides.
    pub fn validate(&self) -> Result<()> {
        if self.window.size == 0 {
            return Err(MonitorError::Config(
                "window size must be non-zero".to_string(),
            ));
        }
        if !self.filter.spike_threshold_m_s.is_finite() || self.filter.spike_threshold_m_s <= 0.0 {
            return Err(MonitorError::Config(
                "spike threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Telemetry input configuration
///
/// Cadence and patience for the primary navigation-status channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Minimum delivery rate requested from the telemetry publisher
    pub delivery_rate: UpdateRate,
    /// Maximum time to wait for a sample before reporting stale data, in ms
    pub poll_timeout_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            delivery_rate: UpdateRate::default(),
            poll_timeout_ms: 1000,
        }
    }
}

/// Attitude-rate input configuration
///
/// The attitude channel is optional and has its own cadence; it is never
/// allowed to piggyback on the telemetry channel's interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttitudeConfig {
    /// Minimum delivery rate requested from the attitude publisher
    pub delivery_rate: UpdateRate,
    /// Age beyond which a held attitude reading is dropped from events, in ms
    pub staleness_ms: u64,
}

impl Default for AttitudeConfig {
    fn default() -> Self {
        Self {
            delivery_rate: UpdateRate::default(),
            staleness_ms: 1000,
        }
    }
}

/// Spike rejection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Instantaneous rates with magnitude above this are treated as
    /// waypoint-switch artifacts and replaced with the previous moving
    /// average, in m/s
    pub spike_threshold_m_s: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            spike_threshold_m_s: 100.0,
        }
    }
}

/// Moving-average window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Number of filtered rate samples to average (240 ≈ 48 s at 5 Hz)
    pub size: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { size: 240 }
    }
}
