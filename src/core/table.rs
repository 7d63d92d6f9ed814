//! Rating tables and per-variable rating matrices.
//!
//! A [`RatingTable`] is built once per run at the input boundary and read
//! by the engine without mutation. Each statistic consumes one
//! [`RatingMatrix`]: the subject × rater grid of a single variable.

use super::errors::{Error, Result};
use super::{Rating, Schema, Subject, SubjectId, VariableType};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    variable: String,
    var_type: VariableType,
    raters: Vec<String>,
    subjects: Vec<Subject>,
    rows: Vec<Vec<Rating>>,
}

impl RatingMatrix {
    pub fn new(
        variable: impl Into<String>,
        var_type: VariableType,
        raters: Vec<String>,
        subjects: Vec<Subject>,
        rows: Vec<Vec<Rating>>,
    ) -> Result<Self> {
        let variable = variable.into();
        if raters.len() < 2 {
            return Err(Error::Structure(format!(
                "variable '{variable}' needs at least two raters, got {}",
                raters.len()
            )));
        }
        if subjects.len() != rows.len() {
            return Err(Error::Structure(format!(
                "variable '{variable}' has {} subjects but {} rows",
                subjects.len(),
                rows.len()
            )));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != raters.len())
        {
            return Err(Error::Structure(format!(
                "variable '{variable}' row {i} has {} ratings for {} raters",
                row.len(),
                raters.len()
            )));
        }
        Ok(Self {
            variable,
            var_type,
            raters,
            subjects,
            rows,
        })
    }

    /// Builds a matrix from one column per rater, naming subjects `S1..Sn`
    /// and raters `R1..Rk`.
    pub fn from_columns(var_type: VariableType, columns: &[Vec<Rating>]) -> Result<Self> {
        let n = columns.first().map(Vec::len).unwrap_or(0);
        if columns.iter().any(|c| c.len() != n) {
            return Err(Error::Structure(
                "rater columns have different lengths".to_string(),
            ));
        }
        let raters = (1..=columns.len()).map(|r| format!("R{r}")).collect();
        let subjects = (1..=n).map(|i| Subject::anonymous(format!("S{i}"))).collect();
        let rows = (0..n)
            .map(|i| columns.iter().map(|c| c[i]).collect())
            .collect();
        Self::new("var", var_type, raters, subjects, rows)
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    pub fn raters(&self) -> &[String] {
        &self.raters
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn n_subjects(&self) -> usize {
        self.rows.len()
    }

    pub fn n_raters(&self) -> usize {
        self.raters.len()
    }

    pub fn rows(&self) -> &[Vec<Rating>] {
        &self.rows
    }

    pub fn column(&self, rater: usize) -> Vec<Rating> {
        self.rows.iter().map(|row| row[rater]).collect()
    }

    /// Rows where every rater supplied a value.
    pub fn complete_rows(&self) -> impl Iterator<Item = &[Rating]> {
        self.rows
            .iter()
            .filter(|row| row.iter().all(Option::is_some))
            .map(Vec::as_slice)
    }

    /// Projection onto a subset of raters, by column index.
    pub fn select(&self, raters: &[usize]) -> Result<Self> {
        if let Some(bad) = raters.iter().find(|&&r| r >= self.raters.len()) {
            return Err(Error::UnknownRater(format!("column {bad}")));
        }
        Self::new(
            self.variable.clone(),
            self.var_type,
            raters.iter().map(|&r| self.raters[r].clone()).collect(),
            self.subjects.clone(),
            self.rows
                .iter()
                .map(|row| raters.iter().map(|&r| row[r]).collect())
                .collect(),
        )
    }
}

/// Subject × variable × rater table of optional ratings.
///
/// Alongside the ratings it records which raters coded each subject at all,
/// so a subject one rater skipped is told apart from one where that rater
/// left every variable blank.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingTable {
    subjects: Vec<Subject>,
    raters: Vec<String>,
    schema: Schema,
    ratings: HashMap<String, Vec<Vec<Rating>>>,
    coded: Vec<Vec<bool>>,
}

impl RatingTable {
    pub fn builder(schema: Schema, raters: Vec<String>) -> RatingTableBuilder {
        RatingTableBuilder::new(schema, raters)
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn raters(&self) -> &[String] {
        &self.raters
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rater_index(&self, name: &str) -> Result<usize> {
        self.raters
            .iter()
            .position(|r| r == name)
            .ok_or_else(|| Error::UnknownRater(name.to_string()))
    }

    /// Whether `rater` has a record for the subject at `subject`.
    pub fn is_coded(&self, subject: usize, rater: usize) -> bool {
        self.coded
            .get(subject)
            .and_then(|row| row.get(rater))
            .copied()
            .unwrap_or(false)
    }

    /// Table restricted to the subjects every one of its raters coded.
    pub fn shared_subjects(&self) -> Self {
        let keep: Vec<usize> = self
            .coded
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().all(|&c| c))
            .map(|(i, _)| i)
            .collect();
        let ratings = self
            .ratings
            .iter()
            .map(|(var, rows)| (var.clone(), keep.iter().map(|&i| rows[i].clone()).collect()))
            .collect();
        Self {
            subjects: keep.iter().map(|&i| self.subjects[i].clone()).collect(),
            raters: self.raters.clone(),
            schema: self.schema.clone(),
            ratings,
            coded: keep.iter().map(|&i| self.coded[i].clone()).collect(),
        }
    }

    /// Matrix for one declared variable. Variables that no rater supplied
    /// come back as an all-Missing matrix.
    pub fn matrix(&self, variable: &str) -> Result<RatingMatrix> {
        let var_type = self
            .schema
            .type_of(variable)
            .ok_or_else(|| Error::UndeclaredVariable(variable.to_string()))?;
        let rows = self.ratings.get(variable).cloned().unwrap_or_else(|| {
            vec![vec![None; self.raters.len()]; self.subjects.len()]
        });
        RatingMatrix::new(
            variable,
            var_type,
            self.raters.clone(),
            self.subjects.clone(),
            rows,
        )
    }

    /// Every schema variable's matrix, in schema order.
    pub fn matrices(&self) -> Result<Vec<RatingMatrix>> {
        self.schema.names().map(|name| self.matrix(name)).collect()
    }

    /// Table restricted to the named raters, in the given order.
    pub fn select_raters(&self, names: &[&str]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|n| self.rater_index(n))
            .collect::<Result<Vec<_>>>()?;
        let ratings = self
            .ratings
            .iter()
            .map(|(var, rows)| {
                let projected = rows
                    .iter()
                    .map(|row| indices.iter().map(|&i| row[i]).collect())
                    .collect();
                (var.clone(), projected)
            })
            .collect();
        let coded = self
            .coded
            .iter()
            .map(|row| indices.iter().map(|&i| row[i]).collect())
            .collect();
        Ok(Self {
            subjects: self.subjects.clone(),
            raters: names.iter().map(|n| n.to_string()).collect(),
            schema: self.schema.clone(),
            ratings,
            coded,
        })
    }
}

#[derive(Debug)]
pub struct RatingTableBuilder {
    schema: Schema,
    raters: Vec<String>,
    subjects: Vec<Subject>,
    subject_index: HashMap<SubjectId, usize>,
    ratings: HashMap<String, Vec<Vec<Rating>>>,
    coded: Vec<Vec<bool>>,
}

impl RatingTableBuilder {
    pub fn new(schema: Schema, raters: Vec<String>) -> Self {
        Self {
            schema,
            raters,
            subjects: Vec::new(),
            subject_index: HashMap::new(),
            ratings: HashMap::new(),
            coded: Vec::new(),
        }
    }

    /// Registers a subject; re-adding an existing id keeps the first entry.
    pub fn subject(&mut self, subject: Subject) -> &mut Self {
        if !self.subject_index.contains_key(&subject.id) {
            self.subject_index
                .insert(subject.id.clone(), self.subjects.len());
            self.subjects.push(subject);
            let n_raters = self.raters.len();
            for rows in self.ratings.values_mut() {
                rows.push(vec![None; n_raters]);
            }
            self.coded.push(vec![false; n_raters]);
        }
        self
    }

    /// Records one rating. Any call, even with a Missing value, marks the
    /// subject as coded by `rater`.
    pub fn rate(
        &mut self,
        subject: &SubjectId,
        variable: &str,
        rater: &str,
        value: Rating,
    ) -> Result<&mut Self> {
        if !self.schema.contains(variable) {
            return Err(Error::UndeclaredVariable(variable.to_string()));
        }
        let rater_idx = self
            .raters
            .iter()
            .position(|r| r == rater)
            .ok_or_else(|| Error::UnknownRater(rater.to_string()))?;
        let subject_idx = *self
            .subject_index
            .get(subject)
            .ok_or_else(|| Error::Structure(format!("unknown subject '{subject}'")))?;

        let (n_subjects, n_raters) = (self.subjects.len(), self.raters.len());
        let rows = self
            .ratings
            .entry(variable.to_string())
            .or_insert_with(|| vec![vec![None; n_raters]; n_subjects]);
        rows[subject_idx][rater_idx] = value;
        self.coded[subject_idx][rater_idx] = true;
        Ok(self)
    }

    pub fn build(self) -> Result<RatingTable> {
        if self.raters.len() < 2 {
            return Err(Error::Structure(format!(
                "a rating table needs at least two raters, got {}",
                self.raters.len()
            )));
        }
        Ok(RatingTable {
            subjects: self.subjects,
            raters: self.raters,
            schema: self.schema,
            ratings: self.ratings,
            coded: self.coded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rating;

    fn schema() -> Schema {
        Schema::new()
            .with("DOCS", VariableType::Binary)
            .with("METH", VariableType::Count)
    }

    fn raters() -> Vec<String> {
        vec!["A".to_string(), "B".to_string()]
    }

    #[test]
    fn test_builder_rejects_undeclared_variable() {
        let mut builder = RatingTable::builder(schema(), raters());
        builder.subject(Subject::anonymous("VG1"));
        let err = builder
            .rate(&SubjectId::new("VG1"), "MYSTERY", "A", rating(1.0))
            .err()
            .unwrap();
        assert!(matches!(err, Error::UndeclaredVariable(v) if v == "MYSTERY"));
    }

    #[test]
    fn test_builder_rejects_unknown_rater() {
        let mut builder = RatingTable::builder(schema(), raters());
        builder.subject(Subject::anonymous("VG1"));
        let err = builder
            .rate(&SubjectId::new("VG1"), "DOCS", "C", rating(1.0))
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnknownRater(_)));
    }

    #[test]
    fn test_unrated_variable_is_all_missing() {
        let mut builder = RatingTable::builder(schema(), raters());
        builder.subject(Subject::anonymous("VG1"));
        builder.subject(Subject::anonymous("VG2"));
        builder
            .rate(&SubjectId::new("VG1"), "DOCS", "A", rating(1.0))
            .unwrap();
        let table = builder.build().unwrap();

        let meth = table.matrix("METH").unwrap();
        assert_eq!(meth.n_subjects(), 2);
        assert!(meth.rows().iter().flatten().all(Option::is_none));

        let docs = table.matrix("DOCS").unwrap();
        assert_eq!(docs.rows()[0], vec![rating(1.0), None]);
        assert_eq!(docs.rows()[1], vec![None, None]);
    }

    #[test]
    fn test_subject_added_after_ratings_extends_rows() {
        let mut builder = RatingTable::builder(schema(), raters());
        builder.subject(Subject::anonymous("VG1"));
        builder
            .rate(&SubjectId::new("VG1"), "DOCS", "B", rating(0.0))
            .unwrap();
        builder.subject(Subject::anonymous("VG2"));
        builder
            .rate(&SubjectId::new("VG2"), "DOCS", "A", rating(1.0))
            .unwrap();
        let table = builder.build().unwrap();
        let docs = table.matrix("DOCS").unwrap();
        assert_eq!(docs.column(0), vec![None, rating(1.0)]);
        assert_eq!(docs.column(1), vec![rating(0.0), None]);
    }

    #[test]
    fn test_matrix_requires_two_raters() {
        let err = RatingMatrix::from_columns(VariableType::Binary, &[vec![rating(1.0)]]);
        assert!(matches!(err, Err(Error::Structure(_))));
    }

    #[test]
    fn test_select_raters_reorders_columns() {
        let mut builder = RatingTable::builder(schema(), vec!["A".into(), "B".into(), "C".into()]);
        builder.subject(Subject::anonymous("VG1"));
        for (rater, v) in [("A", 1.0), ("B", 2.0), ("C", 3.0)] {
            builder
                .rate(&SubjectId::new("VG1"), "METH", rater, rating(v))
                .unwrap();
        }
        let table = builder.build().unwrap();
        let projected = table.select_raters(&["C", "A"]).unwrap();
        assert_eq!(projected.raters(), &["C".to_string(), "A".to_string()]);
        assert_eq!(
            projected.matrix("METH").unwrap().rows()[0],
            vec![rating(3.0), rating(1.0)]
        );
        assert!(table.select_raters(&["Z"]).is_err());
    }

    #[test]
    fn test_shared_subjects_follow_coverage_not_values() {
        let mut builder = RatingTable::builder(schema(), vec!["A".into(), "B".into(), "C".into()]);
        for id in ["VG1", "VG2", "VG3"] {
            builder.subject(Subject::anonymous(id));
        }
        // VG1: everyone coded, C left the value blank
        for (rater, value) in [("A", rating(1.0)), ("B", rating(1.0)), ("C", None)] {
            builder
                .rate(&SubjectId::new("VG1"), "DOCS", rater, value)
                .unwrap();
        }
        // VG2: C never coded it
        for rater in ["A", "B"] {
            builder
                .rate(&SubjectId::new("VG2"), "DOCS", rater, rating(0.0))
                .unwrap();
        }
        let table = builder.build().unwrap();

        assert!(table.is_coded(0, 2));
        assert!(!table.is_coded(1, 2));
        assert!(!table.is_coded(2, 0));

        let all: Vec<_> = table
            .shared_subjects()
            .subjects()
            .iter()
            .map(|s| s.id.as_str().to_string())
            .collect();
        assert_eq!(all, vec!["VG1"]);

        let ab = table.select_raters(&["A", "B"]).unwrap().shared_subjects();
        assert_eq!(ab.subjects().len(), 2);
        assert_eq!(
            ab.matrix("DOCS").unwrap().rows()[1],
            vec![rating(0.0), rating(0.0)]
        );
        assert_eq!(ab.matrix("METH").unwrap().n_subjects(), 2);
    }

    #[test]
    fn test_complete_rows_skips_partial_subjects() {
        let m = RatingMatrix::from_columns(
            VariableType::Binary,
            &[
                vec![rating(1.0), rating(0.0), None],
                vec![rating(1.0), None, rating(1.0)],
                vec![rating(1.0), rating(1.0), rating(0.0)],
            ],
        )
        .unwrap();
        assert_eq!(m.complete_rows().count(), 1);
    }
}
