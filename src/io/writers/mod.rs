pub mod csv;
pub mod json;
pub mod markdown;
pub mod terminal;

pub use self::csv::{write_disagreement_csv, write_disagreement_exports};
pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use terminal::TerminalWriter;

use crate::aggregation::{interpretation_label, MultiRaterSummary, PairwiseSummary, StatSummary};
use crate::analysis::{MultiRaterVariableResult, PairwiseVariableResult};
use crate::core::Rating;
use crate::disagreement::Disagreement;

/// One line of a dataset summary, shared by the text writers.
pub(crate) struct SummaryLine {
    pub label: &'static str,
    pub value: String,
    pub note: String,
}

impl SummaryLine {
    fn coefficient(label: &'static str, summary: &StatSummary) -> Self {
        Self {
            label,
            value: summary.display(3),
            note: match summary.mean {
                Some(mean) => format!(
                    "{} variables, {}",
                    summary.n_valid,
                    interpretation_label(Some(mean))
                ),
                None => String::new(),
            },
        }
    }

    fn rate(label: &'static str, summary: &StatSummary) -> Self {
        Self {
            label,
            value: summary.display_percent(),
            note: if summary.mean.is_some() {
                format!("{} variables", summary.n_valid)
            } else {
                String::new()
            },
        }
    }
}

pub(crate) fn pairwise_summary_lines(summary: &PairwiseSummary) -> Vec<SummaryLine> {
    vec![
        SummaryLine::rate("Overall agreement", &summary.agreement),
        SummaryLine::coefficient("Mean Gwet's AC1", &summary.gwet_ac1),
        SummaryLine::coefficient("Mean Krippendorff's Alpha", &summary.kripp_alpha),
        SummaryLine::coefficient("Mean Cohen's Kappa", &summary.kappa),
        SummaryLine::coefficient("Mean ICC(2,1)", &summary.icc),
    ]
}

pub(crate) fn multi_summary_lines(summary: &MultiRaterSummary) -> Vec<SummaryLine> {
    let levels = summary.levels;
    vec![
        SummaryLine::rate("Full agreement", &summary.full_agreement),
        SummaryLine::rate("Majority agreement", &summary.majority_agreement),
        SummaryLine::coefficient("Mean Gwet's AC1", &summary.gwet_ac1),
        SummaryLine::coefficient("Mean Krippendorff's Alpha", &summary.kripp_alpha),
        SummaryLine::coefficient("Mean Fleiss' Kappa", &summary.fleiss_kappa),
        SummaryLine::coefficient("Mean ICC(2,1)", &summary.icc),
        SummaryLine {
            label: "Agreement levels",
            value: format!(
                "all {} / majority {} / none {}",
                levels.all, levels.majority, levels.none
            ),
            note: format!("{} complete subject-variable cells", levels.total()),
        },
    ]
}

/// "Kappa: 2 undefined, 1 missing" for every statistic with excluded entries.
pub(crate) fn footnotes(entries: &[(&str, &StatSummary)]) -> Vec<String> {
    entries
        .iter()
        .filter(|(_, s)| s.n_excluded() > 0)
        .map(|(name, s)| {
            let parts: Vec<String> = [
                (s.n_undefined, "undefined"),
                (s.n_missing, "missing"),
                (s.n_insufficient, "below minimum sample"),
            ]
            .iter()
            .filter(|(n, _)| *n > 0)
            .map(|(n, what)| format!("{n} {what}"))
            .collect();
            format!("{name}: {}", parts.join(", "))
        })
        .collect()
}

pub(crate) fn pairwise_footnotes(summary: &PairwiseSummary) -> Vec<String> {
    footnotes(&[
        ("Agreement", &summary.agreement),
        ("AC1", &summary.gwet_ac1),
        ("Alpha", &summary.kripp_alpha),
        ("Kappa", &summary.kappa),
        ("ICC", &summary.icc),
    ])
}

pub(crate) fn multi_footnotes(summary: &MultiRaterSummary) -> Vec<String> {
    footnotes(&[
        ("Full agreement", &summary.full_agreement),
        ("AC1", &summary.gwet_ac1),
        ("Alpha", &summary.kripp_alpha),
        ("Fleiss' Kappa", &summary.fleiss_kappa),
        ("ICC", &summary.icc),
    ])
}

pub(crate) const PAIRWISE_HEADERS: [&str; 9] = [
    "Variable", "Type", "N", "Agree", "AC1", "Alpha", "Kappa", "ICC", "Dis",
];

pub(crate) fn pairwise_row(v: &PairwiseVariableResult) -> [String; 9] {
    [
        v.variable.clone(),
        v.var_type.to_string(),
        v.n_valid.to_string(),
        v.agreement.display_percent(),
        v.gwet_ac1.display(3),
        v.kripp_alpha.display(3),
        v.kappa.display(3),
        v.icc.display(3),
        v.n_disagreements.to_string(),
    ]
}

pub(crate) const MULTI_HEADERS: [&str; 10] = [
    "Variable", "Type", "N", "Full", "Majority", "AC1", "Alpha", "Fleiss", "ICC", "Dis",
];

pub(crate) fn multi_row(v: &MultiRaterVariableResult) -> [String; 10] {
    [
        v.variable.clone(),
        v.var_type.to_string(),
        v.n_complete.to_string(),
        v.full_agreement.display_percent(),
        v.majority_agreement.display_percent(),
        v.gwet_ac1.display(3),
        v.kripp_alpha.display(3),
        v.fleiss_kappa.display(3),
        v.icc.display(3),
        v.n_disagreements.to_string(),
    ]
}

pub(crate) fn format_rating(rating: Rating) -> String {
    rating
        .map(|v| v.to_string())
        .unwrap_or_else(|| "missing".to_string())
}

/// `Acme (VG7): Claude=1, Human=0`
pub(crate) fn disagreement_line(d: &Disagreement) -> String {
    let values: Vec<String> = d
        .values
        .iter()
        .map(|(rater, v)| format!("{rater}={}", format_rating(*v)))
        .collect();
    if d.subject_name == d.subject_id.as_str() {
        format!("{}: {}", d.subject_id, values.join(", "))
    } else {
        format!("{} ({}): {}", d.subject_name, d.subject_id, values.join(", "))
    }
}
