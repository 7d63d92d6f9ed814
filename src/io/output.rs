use super::writers::{JsonWriter, MarkdownWriter, TerminalWriter};
use crate::analysis::ReliabilityReport;
use crate::formatting::FormattingConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    #[default]
    Terminal,
}

impl OutputFormat {
    /// File extension used when the report is saved next to the CSV exports.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Terminal => "txt",
        }
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &ReliabilityReport) -> anyhow::Result<()>;
}

/// JSON wrapper adding provenance to a report.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    pub generated_at: DateTime<Utc>,
    pub tool_version: &'static str,
    pub report: &'a ReliabilityReport,
}

impl<'a> ReportEnvelope<'a> {
    pub fn new(report: &'a ReliabilityReport) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION"),
            report,
        }
    }
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
    formatting: FormattingConfig,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::with_formatting(writer, formatting)),
    }
}

/// Render a report into a string.
pub fn render(
    report: &ReliabilityReport,
    format: OutputFormat,
    formatting: FormattingConfig,
) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    create_writer(format, &mut buffer, formatting).write_report(report)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_serde_names() {
        let format: OutputFormat = serde_json::from_str("\"markdown\"").unwrap();
        assert_eq!(format, OutputFormat::Markdown);
        assert_eq!(OutputFormat::default(), OutputFormat::Terminal);
        assert_eq!(OutputFormat::Terminal.extension(), "txt");
    }
}
