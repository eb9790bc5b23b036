pub mod calculator;
pub mod engine;
pub mod report;
pub mod store;

pub use crate::domain::model::{
    AcademicYear, GradeScale, GradeSelections, Subject, TermSelections, YearSelections, Years,
};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
