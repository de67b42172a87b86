pub mod sample;
pub mod source;

pub use sample::{AttitudeSample, TelemetrySample};
pub use source::{
    AttitudeSource, ChannelAttitudeSource, ChannelSource, Poll, ReplaySource, TelemetrySource,
};
