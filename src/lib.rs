pub mod config;
pub mod error;
pub mod monitor;
pub mod output;
pub mod telemetry;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::MonitorConfig;
pub use error::{MonitorError, Result};
pub use monitor::{MonitorTask, ProgressEvent, ProgressMonitor};
