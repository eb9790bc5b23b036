pub mod demo;
pub mod grade_config;

pub use grade_config::GradeConfiguration;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "uninest-gpa")]
#[command(about = "Letter-grade GPA calculator for UniNest")]
pub struct CliConfig {
    /// Grade configuration file (TOML, or JSON by extension). Uses the demo dataset when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding saved grade selections
    #[arg(long, global = true, default_value = "./.uninest")]
    pub data_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Show the letter-grade conversion table
    Scale,
    /// List configured years and their terms
    Years,
    /// List a term's subjects with the grades chosen so far
    Subjects {
        #[arg(long)]
        year: String,
        #[arg(long)]
        term: String,
    },
    /// Choose a letter grade for a subject
    Set {
        #[arg(long)]
        year: String,
        #[arg(long)]
        term: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        grade: String,
    },
    /// Remove the grade chosen for a subject
    Clear {
        #[arg(long)]
        year: String,
        #[arg(long)]
        term: String,
        #[arg(long)]
        subject: String,
    },
    /// Per-term and cumulative GPA for a year
    Report {
        #[arg(long)]
        year: String,
    },
    /// GPA across every configured year
    Overall,
    /// Write a year's grades and GPAs to a CSV or TSV file
    Export {
        #[arg(long)]
        year: String,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value = "csv")]
        format: String,
    },
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir.to_string_lossy())?;
        if let Some(config) = &self.config {
            validate_path("config", &config.to_string_lossy())?;
        }
        if let CliCommand::Export { output, format, .. } = &self.command {
            validate_path("output", &output.to_string_lossy())?;
            format.parse::<crate::core::report::ReportFormat>()?;
        }
        Ok(())
    }
}
