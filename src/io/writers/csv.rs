//! Disagreement exports for adjudication spreadsheets.

use crate::analysis::{PairwiseAnalysis, ReliabilityReport};
use crate::disagreement::{disagreement_rows, Disagreement};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One row per disagreement: variable, subject id, subject name, then one
/// column per rater (blank for missing).
pub fn write_disagreement_csv<'a, W: Write>(
    writer: W,
    raters: &[String],
    disagreements: impl IntoIterator<Item = &'a Disagreement>,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["variable", "subject_id", "subject_name"];
    header.extend(raters.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for row in disagreement_rows(disagreements) {
        let mut record = vec![row.variable, row.subject_id, row.subject_name];
        record.extend(row.values);
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn file_stem_part(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

pub fn pair_file_name(pair: &PairwiseAnalysis) -> String {
    format!(
        "disagreements_{}_vs_{}.csv",
        file_stem_part(&pair.rater_a),
        file_stem_part(&pair.rater_b)
    )
}

fn export(path: PathBuf, raters: &[String], rows: Vec<&Disagreement>) -> anyhow::Result<PathBuf> {
    write_disagreement_csv(File::create(&path)?, raters, rows)?;
    tracing::info!("Wrote {}", path.display());
    Ok(path)
}

/// Writes `disagreements.csv` (the two-rater or all-rater view) and, for
/// three or more raters, one `disagreements_<a>_vs_<b>.csv` per pair.
pub fn write_disagreement_exports(
    report: &ReliabilityReport,
    dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    match report {
        ReliabilityReport::Pairwise(pair) => Ok(vec![export(
            dir.join("disagreements.csv"),
            &[pair.rater_a.clone(), pair.rater_b.clone()],
            pair.disagreements().collect(),
        )?]),
        ReliabilityReport::MultiRater { pairs, multi, .. } => {
            let mut written = vec![export(
                dir.join("disagreements.csv"),
                &multi.raters,
                multi.disagreements().collect(),
            )?];
            for pair in pairs {
                written.push(export(
                    dir.join(pair_file_name(pair)),
                    &[pair.rater_a.clone(), pair.rater_b.clone()],
                    pair.disagreements().collect(),
                )?);
            }
            Ok(written)
        }
    }
}
