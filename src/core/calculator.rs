use crate::core::engine::{gauge_percent, GpaEngine, TermTally};
use crate::core::report::{SubjectRow, TermReport, YearReport};
use crate::core::store::GradeSelectionStore;
use crate::domain::model::{AcademicYear, GradeSelections};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{EntryKind, GpaError, Result};

/// A single user action against the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetGrade {
        year: String,
        term: String,
        subject: String,
        letter: String,
    },
    ClearGrade {
        year: String,
        term: String,
        subject: String,
    },
    /// Recompute only.
    Refresh { year: String },
}

impl Command {
    pub fn year(&self) -> &str {
        match self {
            Command::SetGrade { year, .. }
            | Command::ClearGrade { year, .. }
            | Command::Refresh { year } => year,
        }
    }
}

/// Ties configuration, persisted selections and the engine together. Each
/// command is validated, applied to the store, then followed by a full
/// recompute of the year it touched.
pub struct GpaCalculator<S: Storage, C: ConfigProvider> {
    store: GradeSelectionStore<S>,
    config: C,
}

impl<S: Storage, C: ConfigProvider> GpaCalculator<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            store: GradeSelectionStore::new(storage),
            config,
        }
    }

    pub fn with_store(store: GradeSelectionStore<S>, config: C) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn store(&self) -> &GradeSelectionStore<S> {
        &self.store
    }

    pub fn engine(&self) -> GpaEngine<'_> {
        GpaEngine::new(self.config.scale())
    }

    pub fn execute(&self, command: Command) -> Result<YearReport> {
        tracing::debug!("Executing {:?}", command);

        match &command {
            Command::SetGrade {
                year,
                term,
                subject,
                letter,
            } => {
                // 先確認科目與成績都存在，才寫入存儲
                self.ensure_subject(year, term, subject)?;
                if !self.config.scale().contains(letter) {
                    return Err(GpaError::UnknownGrade {
                        letter: letter.clone(),
                    });
                }
                self.store.set_grade(year, term, subject, Some(letter))?;
            }
            Command::ClearGrade {
                year,
                term,
                subject,
            } => {
                self.ensure_subject(year, term, subject)?;
                self.store.set_grade(year, term, subject, None)?;
            }
            Command::Refresh { year } => {
                self.ensure_year(year)?;
            }
        }

        // 每個命令結束後都重新計算整個學年
        self.report(command.year())
    }

    pub fn set_grade(&self, year: &str, term: &str, subject: &str, letter: &str) -> Result<YearReport> {
        self.execute(Command::SetGrade {
            year: year.to_string(),
            term: term.to_string(),
            subject: subject.to_string(),
            letter: letter.to_string(),
        })
    }

    pub fn clear_grade(&self, year: &str, term: &str, subject: &str) -> Result<YearReport> {
        self.execute(Command::ClearGrade {
            year: year.to_string(),
            term: term.to_string(),
            subject: subject.to_string(),
        })
    }

    /// Per-term and cumulative figures for `year` from the stored selections.
    pub fn report(&self, year: &str) -> Result<YearReport> {
        let terms = self.ensure_year(year)?;
        Ok(self.build_report(year, terms, &self.store.load()))
    }

    /// Cumulative GPA across every configured year.
    pub fn overall_gpa(&self) -> f64 {
        self.engine()
            .compute_overall_gpa(self.config.years(), &self.store.load())
    }

    fn build_report(
        &self,
        year: &str,
        terms: &AcademicYear,
        selections: &GradeSelections,
    ) -> YearReport {
        let engine = self.engine();
        let scale = self.config.scale();
        let mut cumulative = TermTally::default();

        let term_reports = terms
            .iter()
            .map(|(term, subjects)| {
                let picks = selections.term(year, term);
                let tally = engine.tally_term(subjects, picks);
                cumulative += tally;

                let rows = subjects
                    .iter()
                    .map(|subject| {
                        let letter = picks
                            .and_then(|p| p.get(&subject.name))
                            .filter(|l| !l.is_empty())
                            .cloned();
                        SubjectRow {
                            name: subject.name.clone(),
                            credits: subject.credits,
                            kind: subject.kind.clone(),
                            points: letter.as_deref().and_then(|l| scale.points(l)),
                            letter,
                        }
                    })
                    .collect();

                TermReport {
                    term: term.clone(),
                    gpa: tally.gpa(),
                    graded_credits: tally.graded_credits,
                    subjects: rows,
                }
            })
            .collect();

        let cumulative_gpa = cumulative.gpa();
        YearReport {
            year: year.to_string(),
            terms: term_reports,
            cumulative_gpa,
            graded_credits: cumulative.graded_credits,
            gauge_percent: gauge_percent(cumulative_gpa),
        }
    }

    fn ensure_year(&self, year: &str) -> Result<&AcademicYear> {
        self.config.year(year).ok_or_else(|| GpaError::UnknownEntry {
            kind: EntryKind::Year,
            name: year.to_string(),
        })
    }

    fn ensure_subject(&self, year: &str, term: &str, subject: &str) -> Result<()> {
        let subjects = self
            .ensure_year(year)?
            .get(term)
            .ok_or_else(|| GpaError::UnknownEntry {
                kind: EntryKind::Term,
                name: term.to_string(),
            })?;

        if subjects.iter().any(|s| s.name == subject) {
            Ok(())
        } else {
            Err(GpaError::UnknownEntry {
                kind: EntryKind::Subject,
                name: subject.to_string(),
            })
        }
    }
}
