use super::{
    disagreement_line, multi_footnotes, multi_row, multi_summary_lines, pairwise_footnotes,
    pairwise_row, pairwise_summary_lines, SummaryLine, MULTI_HEADERS, PAIRWISE_HEADERS,
};
use crate::analysis::{ComparisonMatrix, MultiRaterAnalysis, PairwiseAnalysis, ReliabilityReport};
use crate::aggregation::FlaggedVariable;
use crate::io::output::OutputWriter;
use chrono::Utc;
use std::io::Write;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &ReliabilityReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        match report {
            ReliabilityReport::Pairwise(pair) => self.write_pairwise(pair)?,
            ReliabilityReport::MultiRater {
                pairs,
                multi,
                comparison,
            } => {
                self.write_multi(multi)?;
                self.write_comparison(comparison)?;
                for pair in pairs {
                    self.write_pairwise(pair)?;
                }
            }
        }
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &ReliabilityReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Inter-Rater Reliability Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Raters: {}", report.raters().join(", "))?;
        writeln!(self.writer, "Subjects: {}", report.n_subjects())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, lines: &[SummaryLine]) -> anyhow::Result<()> {
        writeln!(self.writer, "| Measure | Value | Notes |")?;
        writeln!(self.writer, "|---------|-------|-------|")?;
        for line in lines {
            writeln!(
                self.writer,
                "| {} | {} | {} |",
                line.label, line.value, line.note
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_table<const N: usize>(
        &mut self,
        headers: [&str; N],
        rows: impl Iterator<Item = [String; N]>,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "| {} |", headers.join(" | "))?;
        writeln!(self.writer, "|{}", "---|".repeat(N))?;
        for row in rows {
            writeln!(self.writer, "| {} |", row.join(" | "))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_footnotes(&mut self, notes: &[String]) -> anyhow::Result<()> {
        if notes.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "Excluded from means (shown as N/A):")?;
        writeln!(self.writer)?;
        for note in notes {
            writeln!(self.writer, "- {note}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_flagged(&mut self, flagged: &[FlaggedVariable], threshold: f64) -> anyhow::Result<()> {
        if flagged.is_empty() {
            writeln!(
                self.writer,
                "All variables have at least {:.0}% agreement.",
                threshold * 100.0
            )?;
        } else {
            writeln!(
                self.writer,
                "### Variables below {:.0}% agreement ({})",
                threshold * 100.0,
                flagged.len()
            )?;
            writeln!(self.writer)?;
            for f in flagged {
                writeln!(
                    self.writer,
                    "- **{}**: {:.1}% ({} disagreements)",
                    f.variable,
                    f.agreement * 100.0,
                    f.n_disagreements
                )?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_disagreements<'a>(
        &mut self,
        groups: impl Iterator<Item = (&'a str, &'a [crate::disagreement::Disagreement])>,
    ) -> anyhow::Result<()> {
        let mut wrote_heading = false;
        for (variable, disagreements) in groups.filter(|(_, d)| !d.is_empty()) {
            if !wrote_heading {
                writeln!(self.writer, "### Disagreement details")?;
                writeln!(self.writer)?;
                wrote_heading = true;
            }
            writeln!(
                self.writer,
                "**{}** ({} disagreements)",
                variable,
                disagreements.len()
            )?;
            writeln!(self.writer)?;
            for d in disagreements {
                writeln!(self.writer, "- {}", disagreement_line(d))?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_pairwise(&mut self, pair: &PairwiseAnalysis) -> anyhow::Result<()> {
        writeln!(self.writer, "## Pairwise: {}", pair.label())?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Subjects compared: {}, variables: {}",
            pair.summary.n_subjects, pair.summary.n_variables
        )?;
        writeln!(self.writer)?;
        self.write_summary(&pairwise_summary_lines(&pair.summary))?;
        self.write_table(PAIRWISE_HEADERS, pair.variables.iter().map(pairwise_row))?;
        self.write_footnotes(&pairwise_footnotes(&pair.summary))?;
        self.write_flagged(
            &pair.summary.low_agreement,
            pair.summary.low_agreement_threshold,
        )?;
        self.write_disagreements(
            pair.variables
                .iter()
                .map(|v| (v.variable.as_str(), v.disagreements.as_slice())),
        )
    }

    fn write_multi(&mut self, multi: &MultiRaterAnalysis) -> anyhow::Result<()> {
        writeln!(self.writer, "## All raters: {}", multi.raters.join(", "))?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Subjects coded by all raters: {}, variables: {}",
            multi.summary.n_subjects, multi.summary.n_variables
        )?;
        writeln!(self.writer)?;
        self.write_summary(&multi_summary_lines(&multi.summary))?;
        self.write_table(MULTI_HEADERS, multi.variables.iter().map(multi_row))?;
        self.write_footnotes(&multi_footnotes(&multi.summary))?;
        self.write_flagged(
            &multi.summary.low_agreement,
            multi.summary.low_agreement_threshold,
        )?;
        self.write_disagreements(
            multi
                .variables
                .iter()
                .map(|v| (v.variable.as_str(), v.disagreements.as_slice())),
        )
    }

    fn write_comparison(&mut self, comparison: &ComparisonMatrix) -> anyhow::Result<()> {
        writeln!(self.writer, "## Agreement comparison")?;
        writeln!(self.writer)?;
        let mut headers = vec!["Variable".to_string()];
        headers.extend(comparison.pairs.iter().cloned());
        headers.push("All raters".to_string());
        writeln!(self.writer, "| {} |", headers.join(" | "))?;
        writeln!(self.writer, "|{}", "---|".repeat(headers.len()))?;

        for row in &comparison.rows {
            let mut cells = vec![row.variable.clone()];
            cells.extend(row.pairwise.iter().map(|s| s.display_percent()));
            cells.push(row.full_agreement.display_percent());
            writeln!(self.writer, "| {} |", cells.join(" | "))?;
        }

        let mut overall = vec!["**Overall**".to_string()];
        overall.extend(comparison.overall_pairwise.iter().map(|s| s.display_percent()));
        overall.push(comparison.overall_full_agreement.display_percent());
        writeln!(self.writer, "| {} |", overall.join(" | "))?;
        writeln!(self.writer)?;
        Ok(())
    }
}
