//! Output formatters for analysis reports

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::config::{ColorMode, Config, OutputFormat};
use crate::engine::Report;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire report
    fn format(&self, report: &Report) -> String;
}

/// Build the formatter the output configuration asks for
pub fn formatter_for(config: &Config) -> Box<dyn OutputFormatter> {
    match config.output.format {
        OutputFormat::Text => {
            // `colored` itself honors NO_COLOR and CLICOLOR in auto mode
            let mut formatter = TextFormatter::new();
            formatter.colored = config.output.color != ColorMode::Never;
            formatter.show_rule_ids = config.output.verbose;
            Box::new(formatter)
        }
        OutputFormat::Json => Box::new(JsonFormatter {
            pretty: config.output.pretty,
        }),
    }
}
