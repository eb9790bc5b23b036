use crate::domain::model::{AcademicYear, GradeScale, Subject, Years};

/// The 11-step letter scale used when the host supplies none.
pub fn demo_scale() -> GradeScale {
    GradeScale::from([
        ("A+", 4.0),
        ("A", 4.0),
        ("A-", 3.7),
        ("B+", 3.3),
        ("B", 3.0),
        ("B-", 2.7),
        ("C+", 2.3),
        ("C", 2.0),
        ("C-", 1.7),
        ("D", 1.0),
        ("F", 0.0),
    ])
}

pub fn demo_years() -> Years {
    let mut years = Years::new();

    let mut y2024 = AcademicYear::new();
    y2024.insert(
        "Semester 1".to_string(),
        vec![
            Subject::new("Algebra 1", 2.0, "Regular"),
            Subject::new("History", 2.5, "Honors"),
            Subject::new("English", 3.0, "Regular"),
            Subject::new("Calculus", 3.0, "AP"),
        ],
    );
    y2024.insert(
        "Semester 2".to_string(),
        vec![
            Subject::new("Calculus II", 3.5, "Regular"),
            Subject::new("Physics", 3.0, "Honors"),
        ],
    );
    years.insert("2024".to_string(), y2024);

    let mut y2025 = AcademicYear::new();
    y2025.insert(
        "Semester 1".to_string(),
        vec![
            Subject::new("Data Structures", 4.0, "Regular"),
            Subject::new("Discrete Math", 3.0, "Regular"),
        ],
    );
    y2025.insert(
        "Semester 2".to_string(),
        vec![
            Subject::new("Algorithms", 4.0, "Regular"),
            Subject::new("Operating Systems", 3.0, "Honors"),
        ],
    );
    years.insert("2025".to_string(), y2025);

    years
}
