pub mod errors;
pub mod statistic;
pub mod table;

pub use errors::{Error, Result, ResultExt};
pub use statistic::{Absence, Bucket, Degeneracy, Statistic};
pub use table::{RatingMatrix, RatingTable, RatingTableBuilder};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A finite numeric code assigned by one rater.
///
/// Equality, ordering and hashing are total, which lets rating values act as
/// category keys. `-0.0` is folded into `0.0` so both compare equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RatingValue(f64);

impl RatingValue {
    pub const ZERO: RatingValue = RatingValue(0.0);
    pub const ONE: RatingValue = RatingValue(1.0);

    /// Returns `None` for NaN and infinities.
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for RatingValue {
    type Error = String;

    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        RatingValue::new(value).ok_or_else(|| format!("non-finite rating value: {value}"))
    }
}

impl From<RatingValue> for f64 {
    fn from(value: RatingValue) -> f64 {
        value.0
    }
}

impl PartialEq for RatingValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for RatingValue {}

impl Hash for RatingValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for RatingValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RatingValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// One rater's judgment for a (subject, variable) pair. `None` is Missing.
pub type Rating = Option<RatingValue>;

/// Shorthand used heavily in tests and fixtures.
pub fn rating(value: f64) -> Rating {
    RatingValue::new(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}

impl Subject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: SubjectId::new(id),
            name: name.into(),
        }
    }

    /// Subject whose display name is its id.
    pub fn anonymous(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: SubjectId(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Binary,
    Count,
    Ordinal,
}

impl VariableType {
    /// Kappa, AC1 and Fleiss apply to categorical variables only.
    pub fn is_categorical(self) -> bool {
        matches!(self, Self::Binary | Self::Ordinal)
    }

    pub fn distance_level(self) -> DistanceLevel {
        match self {
            Self::Binary => DistanceLevel::Nominal,
            Self::Ordinal => DistanceLevel::Ordinal,
            Self::Count => DistanceLevel::Ratio,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Count => "count",
            Self::Ordinal => "ordinal",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance function used by Krippendorff's Alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceLevel {
    Nominal,
    Ordinal,
    Ratio,
}

/// Variable name to type mapping, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    variables: Vec<(String, VariableType)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schema from per-type name lists, binary first.
    ///
    /// A name listed under two types keeps its first declaration; use
    /// [`Schema::try_declare`] when that should be an error instead.
    pub fn from_lists<S: AsRef<str>>(binary: &[S], count: &[S], ordinal: &[S]) -> Self {
        binary
            .iter()
            .map(|n| (n, VariableType::Binary))
            .chain(count.iter().map(|n| (n, VariableType::Count)))
            .chain(ordinal.iter().map(|n| (n, VariableType::Ordinal)))
            .fold(Self::new(), |schema, (name, ty)| schema.with(name.as_ref(), ty))
    }

    pub fn with(mut self, name: impl Into<String>, ty: VariableType) -> Self {
        let name = name.into();
        if self.type_of(&name).is_none() {
            self.variables.push((name, ty));
        }
        self
    }

    /// Declares a variable, failing if it already has a type.
    pub fn try_declare(&mut self, name: &str, ty: VariableType) -> Result<()> {
        match self.type_of(name) {
            Some(existing) => Err(Error::Configuration(format!(
                "variable '{name}' declared as both {existing} and {ty}"
            ))),
            None => {
                self.variables.push((name.to_string(), ty));
                Ok(())
            }
        }
    }

    pub fn type_of(&self, name: &str) -> Option<VariableType> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.type_of(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, VariableType)> {
        self.variables.iter().map(|(n, ty)| (n.as_str(), *ty))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn count_by_type(&self) -> BTreeMap<&'static str, usize> {
        self.variables
            .iter()
            .fold(BTreeMap::new(), |mut acc, (_, ty)| {
                *acc.entry(ty.as_str()).or_default() += 1;
                acc
            })
    }
}
