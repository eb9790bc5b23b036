use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Letter grade to grade points, kept in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeScale(IndexMap<String, f64>);

impl GradeScale {
    pub fn new(entries: IndexMap<String, f64>) -> Self {
        Self(entries)
    }

    pub fn points(&self, letter: &str) -> Option<f64> {
        self.0.get(letter).copied()
    }

    pub fn contains(&self, letter: &str) -> bool {
        self.0.contains_key(letter)
    }

    /// Letters in configuration order, as offered to the user.
    pub fn letters(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(letter, points)| (letter.as_str(), *points))
    }

    /// Highest points first; equal points list the shorter label first, so
    /// "A" comes before "A+" and "A-".
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.entries().collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.len().cmp(&b.0.len()))
        });
        entries
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, f64); N]> for GradeScale {
    fn from(entries: [(&str, f64); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(letter, points)| (letter.to_string(), points))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_credits")]
    pub credits: f64,
    /// Course category such as "Honors" or "AP". Informational only.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

impl Subject {
    pub fn new(name: impl Into<String>, credits: f64, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credits,
            kind: kind.into(),
        }
    }
}

fn default_kind() -> String {
    "Regular".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCredits {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Accepts numbers and numeric strings; anything else becomes 0.
fn deserialize_credits<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let credits = match RawCredits::deserialize(deserializer)? {
        RawCredits::Number(n) => n,
        RawCredits::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        RawCredits::Other(_) => 0.0,
    };
    Ok(if credits.is_finite() { credits } else { 0.0 })
}

/// Term name to its subjects, in configuration order.
pub type AcademicYear = IndexMap<String, Vec<Subject>>;

/// Year label to academic year, sorted by label.
pub type Years = BTreeMap<String, AcademicYear>;

/// Subject name to chosen letter grade.
pub type TermSelections = BTreeMap<String, String>;

/// Term name to the selections made in that term.
pub type YearSelections = BTreeMap<String, TermSelections>;

/// Every grade the user has picked, keyed year, term, subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeSelections(BTreeMap<String, YearSelections>);

impl GradeSelections {
    pub fn year(&self, year: &str) -> Option<&YearSelections> {
        self.0.get(year)
    }

    pub fn term(&self, year: &str, term: &str) -> Option<&TermSelections> {
        self.year(year).and_then(|terms| terms.get(term))
    }

    pub fn letter(&self, year: &str, term: &str, subject: &str) -> Option<&str> {
        self.term(year, term)
            .and_then(|subjects| subjects.get(subject))
            .map(String::as_str)
    }

    pub fn set(&mut self, year: &str, term: &str, subject: &str, letter: &str) {
        self.0
            .entry(year.to_string())
            .or_default()
            .entry(term.to_string())
            .or_default()
            .insert(subject.to_string(), letter.to_string());
    }

    /// Drops the subject's grade. Emptied term and year maps are kept.
    pub fn remove(&mut self, year: &str, term: &str, subject: &str) -> Option<String> {
        self.0
            .get_mut(year)
            .and_then(|terms| terms.get_mut(term))
            .and_then(|subjects| subjects.remove(subject))
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|terms| terms.values().all(|s| s.is_empty()))
    }
}
