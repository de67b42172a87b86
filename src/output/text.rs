use super::Formatter;
use crate::monitor::ProgressEvent;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, event: &ProgressEvent) -> String {
        let warmup = if event.warming_up { " [warming up]" } else { "" };
        if self.verbose {
            let xtrack = event
                .cross_track_error_m
                .map_or("-".to_string(), |v| format!("{:.4}", v));
            let roll_err = event
                .attitude
                .map_or("-".to_string(), |a| format!("{:.4}", a.roll_rate_error));
            format!(
                "{:<11} dist: {:>9.4} m  avg: {:>8.4} m/s  inst: {:>8.4} m/s [xtrack: {}, roll err: {}, spike: {}]{}",
                event.classification.to_string(),
                event.distance_m,
                event.moving_average_m_s,
                event.instantaneous_rate_m_s,
                xtrack,
                roll_err,
                event.spike_rejected,
                warmup
            )
        } else {
            format!(
                "{:<11} dist: {:>9.4} m  avg: {:>8.4} m/s  inst: {:>8.4} m/s{}",
                event.classification.to_string(),
                event.distance_m,
                event.moving_average_m_s,
                event.instantaneous_rate_m_s,
                warmup
            )
        }
    }
}
