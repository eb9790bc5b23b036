use crate::domain::model::{AcademicYear, GradeScale, Subject, Years};
use crate::utils::error::Result;

/// Durable key-value storage holding serialized entries.
pub trait Storage {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn read_entry(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn write_entry(&self, key: &str, data: &[u8]) -> Result<()>;
}

/// Read-only grade configuration: the letter scale and the year/term/subject tree.
pub trait ConfigProvider {
    fn scale(&self) -> &GradeScale;
    fn years(&self) -> &Years;

    fn year(&self, year: &str) -> Option<&AcademicYear> {
        self.years().get(year)
    }

    fn year_labels(&self) -> Vec<&str> {
        self.years().keys().map(String::as_str).collect()
    }

    fn term_names(&self, year: &str) -> Vec<&str> {
        self.year(year)
            .map(|terms| terms.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Empty when the year or term is not configured.
    fn subjects(&self, year: &str, term: &str) -> &[Subject] {
        self.year(year)
            .and_then(|terms| terms.get(term))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn grade_options(&self) -> Vec<&str> {
        self.scale().letters().collect()
    }
}
