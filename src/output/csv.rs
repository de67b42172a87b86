use super::{Formatter, iso8601_timestamp};
use crate::monitor::ProgressEvent;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, event: &ProgressEvent) -> String {
        let xtrack = event
            .cross_track_error_m
            .map_or(String::new(), |v| format!("{:.4}", v));
        let (commanded, measured) = match event.attitude {
            Some(a) => (
                format!("{:.4}", a.commanded_roll_rate),
                format!("{:.4}", a.measured_roll_rate),
            ),
            None => (String::new(), String::new()),
        };
        format!(
            "{},{:.3},{:.4},{:.4},{:.4},{},{},{},{},{},{}",
            iso8601_timestamp(),
            event.timestamp_s,
            event.distance_m,
            event.moving_average_m_s,
            event.instantaneous_rate_m_s,
            event.spike_rejected,
            event.warming_up,
            xtrack,
            commanded,
            measured,
            event.classification
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "ts,timestamp_s,distance_m,moving_average_m_s,instantaneous_rate_m_s,spike_rejected,warming_up,cross_track_error_m,commanded_roll_rate,measured_roll_rate,classification",
        )
    }
}
