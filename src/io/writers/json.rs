use crate::analysis::ReliabilityReport;
use crate::io::output::{OutputWriter, ReportEnvelope};
use std::io::Write;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &ReliabilityReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&ReportEnvelope::new(report))?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}
