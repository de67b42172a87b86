use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Degenerate sample: non-positive elapsed time ({elapsed_s:.6} s)")]
    DegenerateSample { elapsed_s: f64 },

    #[error("Telemetry channel closed")]
    ChannelClosed,

    #[error("Malformed telemetry record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
