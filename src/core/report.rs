use crate::core::engine::format_gpa;
use crate::utils::error::{GpaError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRow {
    pub name: String,
    pub credits: f64,
    pub kind: String,
    pub letter: Option<String>,
    /// `None` when ungraded or when the letter is not on the scale.
    pub points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermReport {
    pub term: String,
    pub gpa: f64,
    pub graded_credits: f64,
    pub subjects: Vec<SubjectRow>,
}

/// Everything shown for one academic year after a recompute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearReport {
    pub year: String,
    pub terms: Vec<TermReport>,
    pub cumulative_gpa: f64,
    pub graded_credits: f64,
    pub gauge_percent: f64,
}

impl YearReport {
    pub fn term(&self, term: &str) -> Option<&TermReport> {
        self.terms.iter().find(|t| t.term == term)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ReportFormat {
    fn delimiter(self) -> u8 {
        match self {
            ReportFormat::Csv => b',',
            ReportFormat::Tsv => b'\t',
        }
    }
}

impl FromStr for ReportFormat {
    type Err = GpaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "tsv" => Ok(ReportFormat::Tsv),
            other => Err(GpaError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: csv, tsv".to_string(),
            }),
        }
    }
}

pub const REPORT_HEADER: [&str; 7] = ["year", "term", "subject", "credits", "type", "grade", "points"];

/// One row per subject, a "Term GPA" row closing each term and a final
/// "Cumulative GPA" row.
pub fn render_report(report: &YearReport, format: ReportFormat) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(REPORT_HEADER)?;

    for term in &report.terms {
        for subject in &term.subjects {
            let credits = subject.credits.to_string();
            let points = subject.points.map(|p| p.to_string()).unwrap_or_default();
            writer.write_record([
                report.year.as_str(),
                term.term.as_str(),
                subject.name.as_str(),
                credits.as_str(),
                subject.kind.as_str(),
                subject.letter.as_deref().unwrap_or(""),
                points.as_str(),
            ])?;
        }
        let credits = term.graded_credits.to_string();
        let gpa = format_gpa(term.gpa);
        writer.write_record([
            report.year.as_str(),
            term.term.as_str(),
            "Term GPA",
            credits.as_str(),
            "",
            "",
            gpa.as_str(),
        ])?;
    }

    let credits = report.graded_credits.to_string();
    let gpa = format_gpa(report.cumulative_gpa);
    writer.write_record([
        report.year.as_str(),
        "",
        "Cumulative GPA",
        credits.as_str(),
        "",
        "",
        gpa.as_str(),
    ])?;

    let data = writer
        .into_inner()
        .map_err(|e| GpaError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

pub fn export_report<P: AsRef<Path>>(
    report: &YearReport,
    path: P,
    format: ReportFormat,
) -> Result<PathBuf> {
    let path = path.as_ref();
    crate::utils::validation::validate_path("output", &path.to_string_lossy())?;

    let content = render_report(report, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;

    tracing::info!(
        generated_at = %chrono::Utc::now().to_rfc3339(),
        "Exported {} report for {} to {}",
        match format {
            ReportFormat::Csv => "CSV",
            ReportFormat::Tsv => "TSV",
        },
        report.year,
        path.display()
    );

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> YearReport {
        YearReport {
            year: "2025".to_string(),
            terms: vec![TermReport {
                term: "Semester 1".to_string(),
                gpa: 3.5,
                graded_credits: 4.0,
                subjects: vec![
                    SubjectRow {
                        name: "Data Structures".to_string(),
                        credits: 2.0,
                        kind: "Regular".to_string(),
                        letter: Some("B".to_string()),
                        points: Some(3.0),
                    },
                    SubjectRow {
                        name: "Discrete Math, Part 1".to_string(),
                        credits: 2.0,
                        kind: "Regular".to_string(),
                        letter: Some("A".to_string()),
                        points: Some(4.0),
                    },
                    SubjectRow {
                        name: "Seminar".to_string(),
                        credits: 1.0,
                        kind: "Regular".to_string(),
                        letter: None,
                        points: None,
                    },
                ],
            }],
            cumulative_gpa: 3.5,
            graded_credits: 4.0,
            gauge_percent: 87.5,
        }
    }

    #[test]
    fn test_render_csv() {
        let csv = render_report(&sample_report(), ReportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "year,term,subject,credits,type,grade,points");
        assert_eq!(lines[1], "2025,Semester 1,Data Structures,2,Regular,B,3");
        assert_eq!(lines[2], "2025,Semester 1,\"Discrete Math, Part 1\",2,Regular,A,4");
        assert_eq!(lines[3], "2025,Semester 1,Seminar,1,Regular,,");
        assert_eq!(lines[4], "2025,Semester 1,Term GPA,4,,,3.50");
        assert_eq!(lines[5], "2025,,Cumulative GPA,4,,,3.50");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_render_tsv() {
        let tsv = render_report(&sample_report(), ReportFormat::Tsv).unwrap();
        assert!(tsv.starts_with("year\tterm\tsubject\tcredits\ttype\tgrade\tpoints\n"));
        assert!(tsv.contains("2025\tSemester 1\tDiscrete Math, Part 1\t2\tRegular\tA\t4\n"));
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("CSV".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!("tsv".parse::<ReportFormat>().unwrap(), ReportFormat::Tsv);
        assert!("xlsx".parse::<ReportFormat>().is_err());
    }
}
