use super::{
    disagreement_line, multi_footnotes, multi_row, multi_summary_lines, pairwise_footnotes,
    pairwise_row, pairwise_summary_lines, SummaryLine, MULTI_HEADERS, PAIRWISE_HEADERS,
};
use crate::aggregation::FlaggedVariable;
use crate::analysis::{ComparisonMatrix, MultiRaterAnalysis, PairwiseAnalysis, ReliabilityReport};
use crate::core::Statistic;
use crate::disagreement::Disagreement;
use crate::formatting::FormattingConfig;
use crate::io::output::OutputWriter;
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{Cell, Color, Table};
use std::io::Write;

const RULE_WIDTH: usize = 70;

pub struct TerminalWriter<W: Write> {
    writer: W,
    use_color: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_formatting(writer, FormattingConfig::from_env())
    }

    pub fn with_formatting(writer: W, formatting: FormattingConfig) -> Self {
        Self {
            writer,
            use_color: formatting.color.should_use_color(),
        }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &ReliabilityReport) -> anyhow::Result<()> {
        self.write_banner("INTER-RATER RELIABILITY REPORT")?;
        writeln!(self.writer, "Raters: {}", report.raters().join(", "))?;
        writeln!(self.writer, "Subjects: {}", report.n_subjects())?;

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

impl<W: Write> TerminalWriter<W> {
    fn header(&self, text: &str) -> String {
        if self.use_color {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.use_color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        if self.use_color {
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .enforce_styling();
        } else {
            table.load_preset(ASCII_FULL).force_no_tty();
        }
        table
    }

    fn header_cells(&self, headers: &[&str]) -> Vec<Cell> {
        headers
            .iter()
            .map(|h| {
                let cell = Cell::new(h);
                if self.use_color {
                    cell.fg(Color::Cyan)
                } else {
                    cell
                }
            })
            .collect()
    }

    fn write_banner(&mut self, title: &str) -> anyhow::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.writer)?;
        writeln!(self.writer, "{rule}")?;
        writeln!(self.writer, "{}", self.header(title))?;
        writeln!(self.writer, "{rule}")?;
        Ok(())
    }

    fn write_summary(&mut self, lines: &[SummaryLine]) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        for line in lines {
            if line.note.is_empty() {
                writeln!(self.writer, "{}: {}", line.label, line.value)?;
            } else {
                let note = self.dim(&format!("({})", line.note));
                writeln!(self.writer, "{}: {} {}", line.label, line.value, note)?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_footnotes(&mut self, notes: &[String]) -> anyhow::Result<()> {
        if notes.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "N/A entries excluded from means:")?;
        for note in notes {
            writeln!(self.writer, "  {note}")?;
        }
        Ok(())
    }

    fn write_flagged(&mut self, flagged: &[FlaggedVariable], threshold: f64) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        if flagged.is_empty() {
            writeln!(
                self.writer,
                "All variables have >= {:.0}% agreement.",
                threshold * 100.0
            )?;
            return Ok(());
        }
        let title = format!(
            "Variables with < {:.0}% agreement ({}):",
            threshold * 100.0,
            flagged.len()
        );
        writeln!(self.writer, "{}", self.warning(&title))?;
        for f in flagged {
            writeln!(
                self.writer,
                "  {}: {:.1}% ({} disagreements)",
                f.variable,
                f.agreement * 100.0,
                f.n_disagreements
            )?;
        }
        Ok(())
    }

    fn write_disagreements<'a>(
        &mut self,
        groups: impl Iterator<Item = (&'a str, &'a [Disagreement])>,
    ) -> anyhow::Result<()> {
        let mut wrote_heading = false;
        for (variable, disagreements) in groups.filter(|(_, d)| !d.is_empty()) {
            if !wrote_heading {
                writeln!(self.writer)?;
                writeln!(self.writer, "{}", self.header("Disagreement details:"))?;
                wrote_heading = true;
            }
            writeln!(
                self.writer,
                "\n  {} ({} disagreements):",
                variable,
                disagreements.len()
            )?;
            for d in disagreements {
                writeln!(self.writer, "    {}", disagreement_line(d))?;
            }
        }
        Ok(())
    }

    fn agreement_cell(&self, stat: &Statistic, threshold: f64) -> Cell {
        let cell = Cell::new(stat.display_percent());
        match stat.as_value() {
            Some(v) if self.use_color && v < threshold => cell.fg(Color::Red),
            _ => cell,
        }
    }

    fn write_pairwise(&mut self, pair: &PairwiseAnalysis) -> anyhow::Result<()> {
        self.write_banner(&format!("PAIRWISE: {}", pair.label()))?;
        writeln!(
            self.writer,
            "Subjects compared: {}\nVariables: {}",
            pair.summary.n_subjects, pair.summary.n_variables
        )?;
        self.write_summary(&pairwise_summary_lines(&pair.summary))?;

        let threshold = pair.summary.low_agreement_threshold;
        let mut table = self.new_table();
        table.set_header(self.header_cells(&PAIRWISE_HEADERS));
        for v in &pair.variables {
            let mut cells: Vec<Cell> = pairwise_row(v).into_iter().map(Cell::new).collect();
            cells[3] = self.agreement_cell(&v.agreement, threshold);
            table.add_row(cells);
        }
        writeln!(self.writer, "{table}")?;

        self.write_footnotes(&pairwise_footnotes(&pair.summary))?;
        self.write_flagged(&pair.summary.low_agreement, threshold)?;
        self.write_disagreements(
            pair.variables
                .iter()
                .map(|v| (v.variable.as_str(), v.disagreements.as_slice())),
        )
    }

    fn write_multi(&mut self, multi: &MultiRaterAnalysis) -> anyhow::Result<()> {
        self.write_banner(&format!(
            "ALL {} RATERS ({} must agree)",
            multi.raters.len(),
            multi.raters.join(", ")
        ))?;
        writeln!(
            self.writer,
            "Subjects coded by all raters: {}\nVariables: {}",
            multi.summary.n_subjects, multi.summary.n_variables
        )?;
        let ids: Vec<&str> = multi.summary.subject_ids.iter().map(|id| id.as_str()).collect();
        writeln!(self.writer, "Subject ids: {}", ids.join(", "))?;
        self.write_summary(&multi_summary_lines(&multi.summary))?;

        let threshold = multi.summary.low_agreement_threshold;
        let mut table = self.new_table();
        table.set_header(self.header_cells(&MULTI_HEADERS));
        for v in &multi.variables {
            let mut cells: Vec<Cell> = multi_row(v).into_iter().map(Cell::new).collect();
            cells[3] = self.agreement_cell(&v.full_agreement, threshold);
            table.add_row(cells);
        }
        writeln!(self.writer, "{table}")?;

        self.write_footnotes(&multi_footnotes(&multi.summary))?;
        self.write_flagged(&multi.summary.low_agreement, threshold)?;
        self.write_disagreements(
            multi
                .variables
                .iter()
                .map(|v| (v.variable.as_str(), v.disagreements.as_slice())),
        )
    }

    fn write_comparison(&mut self, comparison: &ComparisonMatrix) -> anyhow::Result<()> {
        self.write_banner("AGREEMENT COMPARISON")?;

        let mut headers: Vec<&str> = vec!["Variable"];
        headers.extend(comparison.pairs.iter().map(String::as_str));
        headers.push("All raters");

        let mut table = self.new_table();
        table.set_header(self.header_cells(&headers));
        for row in &comparison.rows {
            let mut cells = vec![Cell::new(&row.variable)];
            cells.extend(row.pairwise.iter().map(|s| Cell::new(s.display_percent())));
            cells.push(Cell::new(row.full_agreement.display_percent()));
            table.add_row(cells);
        }
        let mut overall = vec![Cell::new("OVERALL")];
        overall.extend(
            comparison
                .overall_pairwise
                .iter()
                .map(|s| Cell::new(s.display_percent())),
        );
        overall.push(Cell::new(comparison.overall_full_agreement.display_percent()));
        table.add_row(overall);
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}
