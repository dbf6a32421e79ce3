use scigrade_core::format::OutputFormat;
use scigrade_core::Subject;

/// Parse subject from string
pub fn parse_subject(s: &str) -> std::result::Result<Subject, String> {
    s.parse::<Subject>().map_err(|e| e.to_string())
}

/// Parse output format from string
pub fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}
