use std::io::BufRead;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use super::{AttitudeSample, TelemetrySample};
use crate::error::MonitorError;

/// Outcome of one bounded wait on a telemetry source
#[derive(Debug)]
pub enum Poll {
    /// A sample arrived within the timeout
    Sample(TelemetrySample),
    /// No sample arrived within the timeout (stale data)
    Timeout,
    /// The source has delivered everything it ever will
    Closed,
    /// The wait primitive itself failed; treated as transient
    Error(MonitorError),
}

/// A pollable telemetry source
///
/// Abstracts over the delivery transport so the monitor can be driven by a
/// live pub/sub channel, a recorded mission file, or a scripted fake in
/// tests.
pub trait TelemetrySource: Send {
    /// Wait up to `timeout` for the next sample
    fn poll(&mut self, timeout: Duration) -> Poll;
}

/// An optional secondary source of commanded-vs-measured attitude rates
///
/// Polled without blocking once per telemetry cycle; the monitor holds the
/// most recent reading and ages it out independently of the telemetry
/// cadence.
pub trait AttitudeSource: Send {
    /// Return the newest pending attitude sample, if any
    fn try_poll(&mut self) -> Option<AttitudeSample>;
}

/// Telemetry source backed by a crossbeam channel
///
/// The sending side lives with whatever owns the transport (a subscription
/// callback, a simulator thread); disconnection of all senders closes the
/// source.
pub struct ChannelSource {
    rx: Receiver<TelemetrySample>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<TelemetrySample>) -> Self {
        Self { rx }
    }
}

impl TelemetrySource for ChannelSource {
    fn poll(&mut self, timeout: Duration) -> Poll {
        match self.rx.recv_timeout(timeout) {
            Ok(sample) => Poll::Sample(sample),
            Err(RecvTimeoutError::Timeout) => Poll::Timeout,
            Err(RecvTimeoutError::Disconnected) => Poll::Closed,
        }
    }
}

/// Attitude source backed by a crossbeam channel
///
/// Drains the channel and keeps only the newest reading, so a fast publisher
/// cannot back the monitor up.
pub struct ChannelAttitudeSource {
    rx: Receiver<AttitudeSample>,
}

impl ChannelAttitudeSource {
    pub fn new(rx: Receiver<AttitudeSample>) -> Self {
        Self { rx }
    }
}

impl AttitudeSource for ChannelAttitudeSource {
    fn try_poll(&mut self) -> Option<AttitudeSample> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(sample) => latest = Some(sample),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }
}

/// Telemetry source replaying JSON-lines records from a reader
///
/// One `TelemetrySample` per line. Replay ignores the poll timeout and runs
/// as fast as the pipeline consumes; a malformed line surfaces as a
/// transient error so the run loop's throttling applies.
pub struct ReplaySource<R: BufRead> {
    reader: R,
    line: String,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead + Send> TelemetrySource for ReplaySource<R> {
    fn poll(&mut self, _timeout: Duration) -> Poll {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return Poll::Closed,
                Ok(_) => {
                    let trimmed = self.line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return match serde_json::from_str(trimmed) {
                        Ok(sample) => Poll::Sample(sample),
                        Err(e) => Poll::Error(MonitorError::MalformedRecord(e)),
                    };
                }
                Err(e) => return Poll::Error(MonitorError::Io(e)),
            }
        }
    }
}
