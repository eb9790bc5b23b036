pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliCommand, CliConfig};

pub use adapters::{LocalStorage, MemoryStorage};
pub use config::GradeConfiguration;
pub use core::{
    calculator::{Command, GpaCalculator},
    engine::{format_gpa, gauge_percent, GpaEngine, TermTally},
    report::{export_report, render_report, ReportFormat, YearReport},
    store::{GradeSelectionStore, STORAGE_KEY},
};
pub use utils::error::{GpaError, Result};
