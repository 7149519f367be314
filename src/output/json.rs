//! JSON output formatter

use super::OutputFormatter;
use crate::engine::Report;

/// JSON formatter for machine-readable output
///
/// Emits `{ "htmlIssues": [...], "cssIssues": [...] }`.
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &Report) -> String {
        let result = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };

        result.unwrap_or_else(|e| {
            log::warn!("failed to serialize report: {}", e);
            String::new()
        })
    }
}
