use crate::analysis::{analyze, ReliabilityReport};
use crate::config::{configure_thread_pool, load_config, load_config_from, ConcordanceConfig};
use crate::formatting::FormattingConfig;
use crate::input::{build_table, load_rater_dir, RaterResults};
use crate::io::output::{create_writer, OutputFormat, OutputWriter};
use crate::io::writers::{write_disagreement_exports, JsonWriter, MarkdownWriter, TerminalWriter};
use crate::io::ensure_dir;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "irr_summary.json";
pub const REPORT_STEM: &str = "irr_report";

pub struct CompareConfig {
    pub rater_dirs: Vec<PathBuf>,
    pub names: Vec<String>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub config: Option<PathBuf>,
    pub plain: bool,
    pub no_parallel: bool,
    pub quiet: bool,
}

/// Directory names stand in for missing `--name` values.
pub fn rater_names(dirs: &[PathBuf], names: &[String]) -> Result<Vec<String>> {
    if names.is_empty() {
        return Ok(dirs
            .iter()
            .map(|dir| {
                dir.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| dir.display().to_string())
            })
            .collect());
    }
    if names.len() != dirs.len() {
        anyhow::bail!(
            "Got {} rater names for {} directories",
            names.len(),
            dirs.len()
        );
    }
    Ok(names.to_vec())
}

fn resolve_config(path: Option<&Path>) -> Result<ConcordanceConfig> {
    match path {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(load_config()),
    }
}

fn load_raters(dirs: &[PathBuf], names: &[String]) -> Result<Vec<RaterResults>> {
    dirs.iter()
        .zip(names)
        .map(|(dir, name)| {
            let results = load_rater_dir(dir, name)
                .with_context(|| format!("Failed to load results for {name}"))?;
            if results.is_empty() {
                tracing::warn!("No coding records found for {} in {}", name, dir.display());
            }
            Ok(results)
        })
        .collect()
}

/// Load, analyze and print; with `--output`, also save the JSON summary,
/// a report file and the disagreement CSVs.
pub fn run_compare(config: CompareConfig) -> Result<()> {
    let settings = resolve_config(config.config.as_deref())?;
    let mut analysis = settings.analysis_config();
    if config.no_parallel {
        analysis.parallel.enabled = false;
    }
    configure_thread_pool(&analysis.parallel);

    let schema = settings.schema()?;
    let names = rater_names(&config.rater_dirs, &config.names)?;
    let raters = load_raters(&config.rater_dirs, &names)?;
    let table = build_table(&schema, &raters, &settings.input)?;
    let report = analyze(&table, &analysis)?;

    let formatting = if config.plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    };
    formatting.apply();

    let format = config.format.unwrap_or(settings.output.default_format);
    let stdout = std::io::stdout();
    create_writer(format, stdout.lock(), formatting).write_report(&report)?;

    if let Some(dir) = &config.output {
        let written = save_outputs(&report, dir, format)?;
        if !config.quiet {
            eprintln!("Results saved to {} ({} files)", dir.display(), written.len());
        }
    }
    Ok(())
}

/// Files land in `dir`: the JSON summary, the report (markdown when that
/// was requested, plain text otherwise) and the disagreement CSVs.
pub fn save_outputs(
    report: &ReliabilityReport,
    dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;

    let summary_path = dir.join(SUMMARY_FILE);
    JsonWriter::new(BufWriter::new(File::create(&summary_path)?)).write_report(report)?;

    let report_format = match format {
        OutputFormat::Markdown => OutputFormat::Markdown,
        _ => OutputFormat::Terminal,
    };
    let report_path = dir.join(format!("{REPORT_STEM}.{}", report_format.extension()));
    let file = BufWriter::new(File::create(&report_path)?);
    match report_format {
        OutputFormat::Markdown => MarkdownWriter::new(file).write_report(report)?,
        _ => TerminalWriter::with_formatting(file, FormattingConfig::plain()).write_report(report)?,
    }

    let mut written = vec![summary_path, report_path];
    written.extend(write_disagreement_exports(report, dir)?);
    for path in &written {
        tracing::info!("Wrote {}", path.display());
    }
    Ok(written)
}
