use crate::domain::model::{AcademicYear, GradeScale, GradeSelections, Subject, TermSelections, YearSelections, Years};
use std::ops::AddAssign;

/// Highest grade-point value on the 4.0 scale, used to scale the gauge.
pub const MAX_GRADE_POINTS: f64 = 4.0;

/// Running sums over graded subjects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TermTally {
    pub quality_points: f64,
    pub graded_credits: f64,
    pub graded_subjects: usize,
}

impl TermTally {
    /// 0 when nothing is graded.
    pub fn gpa(&self) -> f64 {
        if self.graded_credits > 0.0 {
            self.quality_points / self.graded_credits
        } else {
            0.0
        }
    }
}

impl AddAssign for TermTally {
    fn add_assign(&mut self, other: Self) {
        self.quality_points += other.quality_points;
        self.graded_credits += other.graded_credits;
        self.graded_subjects += other.graded_subjects;
    }
}

/// Weighted GPA over a grade scale. Pure; never fails.
#[derive(Debug, Clone, Copy)]
pub struct GpaEngine<'a> {
    scale: &'a GradeScale,
}

impl<'a> GpaEngine<'a> {
    pub fn new(scale: &'a GradeScale) -> Self {
        Self { scale }
    }

    /// Subjects without a selection are skipped. A selected letter missing
    /// from the scale earns 0 points but its credits still count.
    pub fn tally_term(&self, subjects: &[Subject], selections: Option<&TermSelections>) -> TermTally {
        let mut tally = TermTally::default();
        let Some(selections) = selections else {
            return tally;
        };

        for subject in subjects {
            let letter = match selections.get(&subject.name) {
                Some(letter) if !letter.is_empty() => letter,
                _ => continue,
            };
            let points = self.scale.points(letter).unwrap_or(0.0);
            let credits = effective_credits(subject.credits);
            tally.quality_points += points * credits;
            tally.graded_credits += credits;
            tally.graded_subjects += 1;
        }

        tally
    }

    pub fn tally_year(&self, year: &AcademicYear, selections: Option<&YearSelections>) -> TermTally {
        let mut tally = TermTally::default();
        for (term, subjects) in year {
            tally += self.tally_term(subjects, selections.and_then(|s| s.get(term)));
        }
        tally
    }

    pub fn compute_term_gpa(&self, subjects: &[Subject], selections: Option<&TermSelections>) -> f64 {
        self.tally_term(subjects, selections).gpa()
    }

    /// Quality points and credits are pooled across the year's terms before
    /// dividing, so this is not the mean of the term GPAs.
    pub fn compute_cumulative_gpa(
        &self,
        year: Option<&AcademicYear>,
        selections: Option<&YearSelections>,
    ) -> f64 {
        year.map(|year| self.tally_year(year, selections).gpa())
            .unwrap_or(0.0)
    }

    /// Cumulative GPA across every configured year.
    pub fn compute_overall_gpa(&self, years: &Years, selections: &GradeSelections) -> f64 {
        let mut tally = TermTally::default();
        for (label, year) in years {
            tally += self.tally_year(year, selections.year(label));
        }
        tally.gpa()
    }
}

fn effective_credits(credits: f64) -> f64 {
    if credits.is_finite() && credits > 0.0 {
        credits
    } else {
        0.0
    }
}

/// Share of the 4.0 scale, clamped to 0..=100.
pub fn gauge_percent(gpa: f64) -> f64 {
    let pct = gpa / MAX_GRADE_POINTS * 100.0;
    if pct.is_nan() {
        0.0
    } else {
        pct.clamp(0.0, 100.0)
    }
}

pub fn format_gpa(gpa: f64) -> String {
    format!("{:.2}", gpa)
}
