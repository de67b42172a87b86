use serde_json::json;

use super::{Formatter, iso8601_timestamp};
use crate::monitor::ProgressEvent;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, event: &ProgressEvent) -> String {
        json!({
            "ts": iso8601_timestamp(),
            "event": event,
        })
        .to_string()
    }
}
