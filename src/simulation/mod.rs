//! Synthetic mission telemetry for bench testing and demos.
//!
//! Only built with the `simulation` feature.

mod mission;

pub use mission::{MissionProfile, StallSegment, WaypointSwitch};
